#![cfg(test)]

mod scenarios;
mod scanning;
mod util;
