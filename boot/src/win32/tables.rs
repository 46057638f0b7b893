//! `.CRT$X?A` / `.CRT$X?Z` boundary markers.
//!
//! The linker merges `.CRT$XIA`..`.CRT$XIZ` (and the XC, XP, XT groups) in
//! name order, so everything registered under `.CRT$XIU` and friends lands
//! strictly between the two markers. The markers are null slots and are
//! skipped like any other padding.

use crate::initterm::{CallbackTable, CrtTables, TableSlot};

macro_rules! table_markers {
    ($($begin:ident = $begin_sec:literal, $end:ident = $end_sec:literal;)*) => {
        $(
            #[used]
            #[unsafe(link_section = $begin_sec)]
            static $begin: TableSlot = None;

            #[used]
            #[unsafe(link_section = $end_sec)]
            static $end: TableSlot = None;
        )*
    };
}

table_markers! {
    XI_A = ".CRT$XIA", XI_Z = ".CRT$XIZ";
    XC_A = ".CRT$XCA", XC_Z = ".CRT$XCZ";
    XP_A = ".CRT$XPA", XP_Z = ".CRT$XPZ";
    XT_A = ".CRT$XTA", XT_Z = ".CRT$XTZ";
}

// SAFETY: each pair brackets one merged section group of this image; every
// slot in between is either padding or a registered callback.
pub static LINKED_TABLES: CrtTables = CrtTables {
    c_init: unsafe { CallbackTable::from_bounds(&raw const XI_A, &raw const XI_Z) },
    cxx_init: unsafe { CallbackTable::from_bounds(&raw const XC_A, &raw const XC_Z) },
    pre_terminate: unsafe { CallbackTable::from_bounds(&raw const XP_A, &raw const XP_Z) },
    terminate: unsafe { CallbackTable::from_bounds(&raw const XT_A, &raw const XT_Z) },
};

impl CrtTables {
    /// The four tables the linker assembled for this image.
    pub fn linked() -> &'static CrtTables {
        &LINKED_TABLES
    }
}
