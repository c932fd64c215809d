pub mod layout;
pub mod staff;

pub use layout::{diatonic_index, ledger_steps, staff_step, StaffGeometry, StaffPosition};
pub use staff::{staff_extent, staff_shapes, StaffStyle, StaffView};
