pub mod error;
pub mod import;

pub use error::{ImportError, Result};
pub use import::{
    import_as_f32, import_as_f64, import_as_i16, import_as_i32, import_as_i64, import_as_i8,
    import_as_u16, import_as_u32, import_as_u64, import_as_u8, ImportFilter,
};
