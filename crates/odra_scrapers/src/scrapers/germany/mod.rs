pub mod kontext;

pub use kontext::KontextAdapter;
