//! Ownership of native-allocated output
//!
//! The output pointer is wrapped as soon as the call returns. The guard
//! copies the bytes out and releases the original through the engine's
//! allocator on drop, so every exit path frees it exactly once,
//! including unwinding out of a failed protocol assertion.

use std::ffi::{c_char, c_void};
use std::ptr;

use super::Engine;

/// Native buffer awaiting copy and release
pub struct NativeBuffer<'e, E: Engine + ?Sized> {
    engine: &'e E,
    ptr: *mut c_char,
    len: usize,
}

impl<'e, E: Engine + ?Sized> NativeBuffer<'e, E> {
    /// Take ownership of `ptr`
    ///
    /// # Safety
    /// `ptr` must be null or a live allocation of at least `len` bytes
    /// made by the allocator `engine.release` frees with, and nothing
    /// else may release it.
    pub unsafe fn from_raw(engine: &'e E, ptr: *mut c_char, len: usize) -> Self {
        Self { engine, ptr, len }
    }

    /// Reported length
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Copy the contents of a successful call's output and release the original
    ///
    /// # Panics
    /// If the buffer is null or empty. A successful call always yields
    /// a non-empty buffer; anything else is a native/wrapper protocol
    /// mismatch. The buffer is still released while unwinding.
    pub fn into_vec(self) -> Vec<u8> {
        assert!(!self.ptr.is_null(), "TTF_autohint succeeded without an output buffer");
        assert!(self.len != 0, "TTF_autohint succeeded with an empty output buffer");

        // SAFETY: non-null and valid for `len` bytes per `from_raw`
        unsafe { std::slice::from_raw_parts(self.ptr as *const u8, self.len) }.to_vec()
    }
}

impl<E: Engine + ?Sized> Drop for NativeBuffer<'_, E> {
    fn drop(&mut self) {
        if self.ptr.is_null() {
            return;
        }
        // SAFETY: allocation owned by this guard, released once
        unsafe { self.engine.release(self.ptr as *mut c_void) };
        self.ptr = ptr::null_mut();
    }
}
