#![cfg(test)]

mod scan;
mod util;
