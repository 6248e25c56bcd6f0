mod field_reader;

pub use field_reader::{ByteOrder, FieldReader};
