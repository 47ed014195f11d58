pub mod filehash;
pub mod model;

pub use filehash::digest_file;
pub use model::Transaction;
