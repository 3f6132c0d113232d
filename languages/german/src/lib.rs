mod source;

pub use source::GermanSource;
