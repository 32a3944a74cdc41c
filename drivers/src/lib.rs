#![cfg_attr(not(test), no_std)]

pub mod display;
pub mod initialization;

pub use display::{
    buffer::DisplayBuffer,
    config::Config,
    error::Error,
    ht16k33_7seg_display::{AsyncI2C7SegDisplay, BlinkRate, SyncI2C7SegDisplay},
    render::{Radix, RenderInput, RenderOutcome, RenderStrategy},
};
pub use initialization::{Active, DriverState, Uninitialized};
