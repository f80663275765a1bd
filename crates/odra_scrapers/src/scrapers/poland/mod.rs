pub mod dziennik;

pub use dziennik::DziennikAdapter;
