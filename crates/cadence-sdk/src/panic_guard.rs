// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Catching panics without letting the process-wide hook print them.
//!
//! The hook is installed once and only swallows panics raised on a thread
//! that is inside [`catch_silently`]; every other panic still reaches the
//! previously installed hook. A swallowed panic is handed back to the
//! caller, which decides whether to report it.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static CAPTURED: RefCell<Option<String>> = const { RefCell::new(None) };
}

static INSTALL: Once = Once::new();

fn install_hook() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !CAPTURING.with(Cell::get) {
                previous(info);
                return;
            }
            let mut message = panic_message(info.payload());
            if let Some(location) = info.location() {
                message.push_str(&format!(" at {}:{}", location.file(), location.line()));
            }
            CAPTURED.with(|captured| *captured.borrow_mut() = Some(message));
        }));
    });
}

/// Runs `f`, turning a panic into `Err` with its message and location.
///
/// Nothing is printed for a caught panic. Calls may nest.
pub(crate) fn catch_silently<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    install_hook();
    let outer = CAPTURING.with(|capturing| capturing.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CAPTURING.with(|capturing| capturing.set(outer));
    result.map_err(|payload| {
        CAPTURED
            .with(|captured| captured.borrow_mut().take())
            .unwrap_or_else(|| panic_message(payload.as_ref()))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
