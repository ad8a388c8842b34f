// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `#[repr(C)]` response types shared with the TAK library and the host's
// FFI layer. Layouts match `tak.h` / the wrapper header field for field.

use std::ffi::{c_char, c_int, c_uint};
use std::ptr;

use tak_core::NativeStatus;

/// `TAK_byte_buffer`: a malloc'd byte array and its length.
///
/// Whoever receives a non-null `data` owns it and must release it with
/// `free()`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TakByteBuffer {
    pub data: *mut u8,
    pub length: c_uint,
}

impl TakByteBuffer {
    /// A null buffer of length zero.
    pub const fn empty() -> Self {
        Self {
            data: ptr::null_mut(),
            length: 0,
        }
    }

    /// Borrow a Rust slice as a buffer for an input parameter.
    ///
    /// The library only reads input buffers; the returned value must not
    /// outlive `bytes`.
    pub fn borrowed(bytes: &[u8]) -> Self {
        Self {
            data: bytes.as_ptr().cast_mut(),
            length: bytes.len() as c_uint,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_null() || self.length == 0
    }

    /// View the buffer contents.
    ///
    /// # Safety
    /// `data` must be null or point to at least `length` readable bytes that
    /// stay valid for the returned lifetime.
    pub unsafe fn as_slice(&self) -> &[u8] {
        if self.is_empty() {
            return &[];
        }
        // SAFETY: upheld by the caller.
        unsafe { std::slice::from_raw_parts(self.data, self.length as usize) }
    }

    /// Copy `bytes` into a fresh `malloc` allocation.
    ///
    /// Returns `None` when the allocation fails. A zero-length input still
    /// allocates one byte so the result is distinguishable from "no data".
    pub fn malloc_copy(bytes: &[u8]) -> Option<Self> {
        // SAFETY: malloc with a non-zero size; the result is checked for null
        // before being written to.
        let data = unsafe { libc::malloc(bytes.len().max(1)) }.cast::<u8>();
        if data.is_null() {
            return None;
        }
        // SAFETY: `data` has room for `bytes.len()` bytes and cannot overlap
        // a borrowed Rust slice.
        unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), data, bytes.len()) };
        Some(Self {
            data,
            length: bytes.len() as c_uint,
        })
    }

    /// Release a buffer allocated with `malloc` and reset it to empty.
    ///
    /// # Safety
    /// `data` must be null or a pointer obtained from `malloc` that has not
    /// been freed yet.
    pub unsafe fn free(&mut self) {
        if !self.data.is_null() {
            // SAFETY: upheld by the caller.
            unsafe { libc::free(self.data.cast()) };
        }
        *self = Self::empty();
    }
}

/// `TakByteBufferResponse`: a status plus an owned copy of the output.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TakByteBufferResponse {
    pub return_code: i32,
    pub buffer: TakByteBuffer,
}

impl TakByteBufferResponse {
    /// A response carrying `code` and no data.
    pub fn failure(code: NativeStatus) -> Self {
        Self {
            return_code: code.code(),
            buffer: TakByteBuffer::empty(),
        }
    }

    /// Build the response for a library call that wrote into `output`.
    ///
    /// On `TAK_SUCCESS` the output is copied into a new allocation owned by
    /// the caller; any other code is passed through with an empty buffer. If
    /// the copy cannot be allocated the library's code is kept and the
    /// buffer stays empty.
    ///
    /// # Safety
    /// When `code` is `TAK_SUCCESS`, `output` must describe `length` readable
    /// bytes.
    pub unsafe fn copied_from(code: NativeStatus, output: &TakByteBuffer) -> Self {
        if code != NativeStatus::SUCCESS {
            return Self::failure(code);
        }
        // SAFETY: upheld by the caller for the success case.
        let bytes = unsafe { output.as_slice() };
        match TakByteBuffer::malloc_copy(bytes) {
            Some(buffer) => Self {
                return_code: code.code(),
                buffer,
            },
            None => {
                tracing::error!(len = bytes.len(), "failed to allocate response buffer");
                Self::failure(code)
            }
        }
    }

    pub fn status(&self) -> NativeStatus {
        NativeStatus(self.return_code)
    }
}

/// `TakIdResponse`: the instance identifier string and the call status.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TakIdResponse {
    pub tak_id: *mut c_char,
    pub return_code: c_int,
}

/// `IsRegisteredResponse`: registration flag and the call status.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct IsRegisteredResponse {
    pub is_registered: bool,
    pub return_code: c_int,
}

/// `TAK_ROOT_STATUS` levels.
///
/// Crosses the ABI as a plain `c_int`; use [`RootStatus::from_raw`] to read
/// it so unexpected values never become an invalid enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum RootStatus {
    NotRooted = 0,
    MaybeRooted = 1,
    LikelyRooted = 2,
    Rooted = 3,
}

impl RootStatus {
    pub fn from_raw(raw: c_int) -> Option<Self> {
        match raw {
            0 => Some(Self::NotRooted),
            1 => Some(Self::MaybeRooted),
            2 => Some(Self::LikelyRooted),
            3 => Some(Self::Rooted),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_copies_output() {
        let source = b"sealed payload".to_vec();
        let output = TakByteBuffer::borrowed(&source);

        let mut response = unsafe { TakByteBufferResponse::copied_from(NativeStatus::SUCCESS, &output) };
        assert_eq!(response.status(), NativeStatus::SUCCESS);
        assert_ne!(response.buffer.data, output.data, "response must own a copy");
        assert_eq!(unsafe { response.buffer.as_slice() }, &source[..]);

        unsafe { response.buffer.free() };
        assert!(response.buffer.is_empty());
    }

    #[test]
    fn failure_keeps_code_and_drops_output() {
        let source = [1u8, 2, 3];
        let output = TakByteBuffer::borrowed(&source);

        let response =
            unsafe { TakByteBufferResponse::copied_from(NativeStatus::STORAGE_KEY_NOT_FOUND, &output) };
        assert_eq!(response.status(), NativeStatus::STORAGE_KEY_NOT_FOUND);
        assert!(response.buffer.data.is_null());
        assert_eq!(response.buffer.length, 0);
    }

    #[test]
    fn empty_success_still_allocates() {
        let mut response =
            unsafe { TakByteBufferResponse::copied_from(NativeStatus::SUCCESS, &TakByteBuffer::empty()) };
        assert!(!response.buffer.data.is_null());
        assert_eq!(response.buffer.length, 0);
        unsafe { response.buffer.free() };
    }

    #[test]
    fn root_status_rejects_unknown_levels() {
        assert_eq!(RootStatus::from_raw(2), Some(RootStatus::LikelyRooted));
        assert_eq!(RootStatus::from_raw(7), None);
    }
}
