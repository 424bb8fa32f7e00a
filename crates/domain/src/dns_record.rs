mod generic;
mod provenance;
mod record_type;

pub use generic::{GenericRdata, GenericRecord};
pub use provenance::{SecurityStatus, TrustLevel};
pub use record_type::{RecordClass, RecordType};
