// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// TAK bridge: FFI boundary to the native TAK library.
//
// Every foreign call made by the workspace goes through this crate:
//
// - `provider` (Android only) retains the JavaVM and application context the
//   TAK library pulls back through `getEnvironment` / `getContext`.
// - `exports` (feature `taklib`) is the C ABI the host's FFI layer calls;
//   each function forwards to one `TakLib_*` entry point in `sys`.
// - `buffer` holds the `#[repr(C)]` response types shared by both.

pub mod buffer;

#[cfg(target_os = "android")]
pub mod provider;

#[cfg(feature = "taklib")]
pub mod sys;

#[cfg(feature = "taklib")]
pub mod exports;

pub use buffer::{IsRegisteredResponse, RootStatus, TakByteBuffer, TakByteBufferResponse, TakIdResponse};
