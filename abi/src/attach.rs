//! Host-loader attach/detach notifications for library images.

use core::ffi::c_void;

/// Module instance handle. For executables this is the image base.
pub type HInstance = *mut c_void;

/// Raw reason code as delivered by the host loader.
pub type AttachReasonCode = u32;

pub const DLL_PROCESS_DETACH: AttachReasonCode = 0;
pub const DLL_PROCESS_ATTACH: AttachReasonCode = 1;
pub const DLL_THREAD_ATTACH: AttachReasonCode = 2;
pub const DLL_THREAD_DETACH: AttachReasonCode = 3;

/// Attach event kinds that the sequencer understands.
///
/// Reason codes outside this set are still forwarded to the user handler,
/// they just never run a table.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachReason {
    ProcessDetach = DLL_PROCESS_DETACH,
    ProcessAttach = DLL_PROCESS_ATTACH,
    ThreadAttach = DLL_THREAD_ATTACH,
    ThreadDetach = DLL_THREAD_DETACH,
}

impl AttachReason {
    pub fn from_raw(raw: AttachReasonCode) -> Option<Self> {
        match raw {
            DLL_PROCESS_DETACH => Some(Self::ProcessDetach),
            DLL_PROCESS_ATTACH => Some(Self::ProcessAttach),
            DLL_THREAD_ATTACH => Some(Self::ThreadAttach),
            DLL_THREAD_DETACH => Some(Self::ThreadDetach),
            _ => None,
        }
    }

    #[inline]
    pub fn as_raw(self) -> AttachReasonCode {
        self as AttachReasonCode
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ProcessDetach => "process_detach",
            Self::ProcessAttach => "process_attach",
            Self::ThreadAttach => "thread_attach",
            Self::ThreadDetach => "thread_detach",
        }
    }
}
