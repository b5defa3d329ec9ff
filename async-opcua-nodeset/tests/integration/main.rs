mod compose;
mod load;
mod merge;
mod utils;
