mod atomic;
mod counting;

pub use atomic::AtomicFile;
pub use counting::CountingWriter;
