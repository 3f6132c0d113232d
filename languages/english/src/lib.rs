mod source;

pub use source::EnglishSource;
