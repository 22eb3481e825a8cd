/// Platform-specific functionality — filesystem root enumeration.

pub mod roots;

pub use roots::filesystem_roots;
