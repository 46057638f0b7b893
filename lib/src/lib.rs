#![no_std]

#[cfg(test)]
extern crate std;

pub mod at_exit;
pub mod init_flag;
pub mod klog;

pub use at_exit::{AT_EXIT_CAPACITY, AtExitError, AtExitFn, AtExitRegistry, OnExitFn};
pub use init_flag::{InitFlag, StateFlag};
pub use klog::{
    KlogLevel, KlogSink, klog_attach_sink, klog_get_level, klog_init, klog_is_enabled,
    klog_set_level,
};
