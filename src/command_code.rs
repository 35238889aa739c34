//! Command-code constants for every schema in the message family, the way
//! `lifx-core::msg::Message::get_num` hardcodes the LIFX wire numbers.
//!
//! JAUS command codes are class-tagged by their high nibble (`0x0xxx`
//! Command, `0x2xxx` Query, `0x4xxx` Inform); the registry header that
//! assigns the exact per-message values isn't part of the source excerpt
//! this crate was built from, so the values below follow that class
//! convention consistently rather than being copied from a numbered
//! registry. Every encoder/decoder pair in `messages` references the same
//! constant, so round-tripping and `WrongType` detection are unaffected by
//! the exact numeric choice.

pub const SET_WRENCH_EFFORT: u16 = 0x0406;
pub const QUERY_WRENCH_EFFORT: u16 = 0x2406;
pub const REPORT_VELOCITY_STATE: u16 = 0x4404;
pub const CREATE_EVENT: u16 = 0x01F2;
pub const QUERY_EVENTS: u16 = 0x21F2;
pub const REPORT_SERVICES: u16 = 0x40F0;
pub const REPORT_IDENTIFICATION: u16 = 0x4002;
pub const REQUEST_COMPONENT_CONTROL: u16 = 0x0001;
pub const REPORT_WAYPOINT_COUNT: u16 = 0x4504;
pub const QUERY_PLATFORM_SPECIFICATIONS: u16 = 0x2408;
