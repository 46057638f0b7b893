//! Initializer/finalizer table sequencing.
//!
//! Each table is a `[begin, end)` run of nullable zero-argument callbacks that
//! the linker assembles from `.CRT$X?A` .. `.CRT$X?Z` sub-sections in
//! alphabetical order. Null slots are section padding, not callbacks.
//!
//! Construction runs C-init then C++-init. Destruction drains deferred
//! finalizers, then runs pre-terminate then terminate.

use core::ptr;

use crtstart_abi::DeferredFinalizers;
use crtstart_lib::{klog_debug, klog_trace};

/// Zero-argument table callback.
pub type Pvfv = extern "C" fn();

/// One table slot. `None` is link padding.
pub type TableSlot = Option<Pvfv>;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePhase {
    CInit = 0,
    CxxInit = 1,
    PreTerminate = 2,
    Terminate = 3,
}

impl TablePhase {
    pub const CONSTRUCTION: [TablePhase; 2] = [TablePhase::CInit, TablePhase::CxxInit];
    pub const DESTRUCTION: [TablePhase; 2] = [TablePhase::PreTerminate, TablePhase::Terminate];

    pub fn name(self) -> &'static str {
        match self {
            TablePhase::CInit => "c_init",
            TablePhase::CxxInit => "cxx_init",
            TablePhase::PreTerminate => "pre_terminate",
            TablePhase::Terminate => "terminate",
        }
    }
}

/// Borrowed view of one callback table.
#[derive(Clone, Copy)]
pub struct CallbackTable {
    begin: *const TableSlot,
    end: *const TableSlot,
}

// SAFETY: tables are immutable after link; the pointers are only read.
unsafe impl Sync for CallbackTable {}
unsafe impl Send for CallbackTable {}

impl CallbackTable {
    pub const EMPTY: Self = Self {
        begin: ptr::null(),
        end: ptr::null(),
    };

    pub const fn from_slice(slots: &'static [TableSlot]) -> Self {
        let range = slots.as_ptr_range();
        Self {
            begin: range.start,
            end: range.end,
        }
    }

    /// # Safety
    ///
    /// Every slot in `[begin, end)` must be readable for the life of the
    /// process and hold either null or a valid callback.
    pub const unsafe fn from_bounds(begin: *const TableSlot, end: *const TableSlot) -> Self {
        Self { begin, end }
    }

    /// Number of slots, padding included.
    pub fn slot_count(&self) -> usize {
        if self.begin.is_null() || self.end <= self.begin {
            return 0;
        }
        (self.end as usize - self.begin as usize) / core::mem::size_of::<TableSlot>()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_count() == 0
    }
}

impl core::fmt::Debug for CallbackTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CallbackTable")
            .field("begin", &self.begin)
            .field("slots", &self.slot_count())
            .finish()
    }
}

/// The four tables the link step provides.
#[derive(Debug, Clone, Copy)]
pub struct CrtTables {
    pub c_init: CallbackTable,
    pub cxx_init: CallbackTable,
    pub pre_terminate: CallbackTable,
    pub terminate: CallbackTable,
}

impl CrtTables {
    pub const EMPTY: Self = Self {
        c_init: CallbackTable::EMPTY,
        cxx_init: CallbackTable::EMPTY,
        pre_terminate: CallbackTable::EMPTY,
        terminate: CallbackTable::EMPTY,
    };

    pub fn table(&self, phase: TablePhase) -> CallbackTable {
        match phase {
            TablePhase::CInit => self.c_init,
            TablePhase::CxxInit => self.cxx_init,
            TablePhase::PreTerminate => self.pre_terminate,
            TablePhase::Terminate => self.terminate,
        }
    }
}

/// Invoke every callback in `table` left to right. Returns how many ran.
pub fn run_ordered(table: CallbackTable) -> usize {
    if table.is_empty() {
        return 0;
    }

    let mut ran = 0usize;
    let mut cursor = table.begin;
    while cursor < table.end {
        // SAFETY: `cursor` stays inside the bounds the table was built from.
        let slot = unsafe { *cursor };
        if let Some(func) = slot {
            klog_trace!("    slot {:p}", cursor);
            func();
            ran += 1;
        }
        cursor = unsafe { cursor.add(1) };
    }
    ran
}

pub fn run_phase(tables: &CrtTables, phase: TablePhase) -> usize {
    klog_debug!("[crt:init] phase start -> {}", phase.name());
    let ran = run_ordered(tables.table(phase));
    klog_debug!("[crt:init] phase complete -> {} ({} callbacks)", phase.name(), ran);
    ran
}

/// C-init, then C++-init.
pub fn run_constructors(tables: &CrtTables) {
    for phase in TablePhase::CONSTRUCTION {
        run_phase(tables, phase);
    }
}

/// Deferred finalizers, then pre-terminate, then terminate.
pub fn run_terminators<F: DeferredFinalizers + ?Sized>(tables: &CrtTables, finalizers: &F) {
    finalizers.drain();
    for phase in TablePhase::DESTRUCTION {
        run_phase(tables, phase);
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! crt_table_entry {
    ($section:literal, $tag:ident, $func:ident) => {
        $crate::paste::paste! {
            #[used]
            #[unsafe(link_section = $section)]
            static [<__CRT_ $tag _ $func:upper>]: $crate::initterm::TableSlot =
                ::core::option::Option::Some($func);
        }
    };
}

/// Register `$func` in the C-init table.
#[macro_export]
macro_rules! crt_c_initializer {
    ($func:ident) => {
        $crate::crt_table_entry!(".CRT$XIU", XI, $func);
    };
}

/// Register `$func` in the C++-init table.
#[macro_export]
macro_rules! crt_cxx_initializer {
    ($func:ident) => {
        $crate::crt_table_entry!(".CRT$XCU", XC, $func);
    };
}

/// Register `$func` in the pre-terminate table.
#[macro_export]
macro_rules! crt_pre_terminator {
    ($func:ident) => {
        $crate::crt_table_entry!(".CRT$XPU", XP, $func);
    };
}

/// Register `$func` in the terminate table.
#[macro_export]
macro_rules! crt_terminator {
    ($func:ident) => {
        $crate::crt_table_entry!(".CRT$XTU", XT, $func);
    };
}
