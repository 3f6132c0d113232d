mod posmap;
mod process;

pub use process::TreeTagger;
