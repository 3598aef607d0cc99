mod driver;
mod entity;
mod listener;
mod trace;

pub use driver::{DatabaseDriver, DriverSession};
pub use entity::{Entity, Field, ID_FIELD};
pub use listener::{QueryListener, SenderId};
pub use trace::{LogSink, Severity, TraceSink};
