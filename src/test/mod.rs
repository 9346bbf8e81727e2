#[macro_use]
mod utils;
