//! Windows specific APIs

use super::*;
use std::mem::size_of_val;

pub fn std_handle_to_windows(std: std::os::windows::io::RawHandle) -> HANDLE {
    HANDLE(std as isize)
}

/// Issues a DeviceIoControl that takes an input struct and returns nothing.
pub(crate) fn device_io_control_in<I>(file: &File, code: u32, input: &I) -> io::Result<()> {
    let handle = std_handle_to_windows(file.as_raw_handle());
    unsafe {
        DeviceIoControl(
            handle,
            code,
            Some(input as *const _ as _),
            size_of_val(input) as u32,
            None,
            0,
            None,
            None,
        )
    }?;
    Ok(())
}

pub fn file_disk_allocation(file: &File) -> io::Result<u64> {
    let handle = std_handle_to_windows(file.as_raw_handle());
    let mut stream_info: FILE_STREAM_INFO = Default::default();
    unsafe {
        GetFileInformationByHandleEx(
            handle,
            FileStreamInfo,
            &mut stream_info as *mut _ as _,
            size_of_val(&stream_info) as u32,
        )
    }?;
    Ok(stream_info.StreamAllocationSize as u64)
}

/// Windows reports handle close failures only to debuggers, so dropping is all there is.
pub fn close_file(file: File) -> io::Result<()> {
    drop(file);
    Ok(())
}

impl SparseFile for File {
    fn set_sparse(&self, set_sparse: bool) -> io::Result<()> {
        let input = FILE_SET_SPARSE_BUFFER {
            SetSparse: set_sparse.into(),
        };
        device_io_control_in(self, FSCTL_SET_SPARSE, &input)
    }
}

pub(crate) fn is_unsupported_os_error(code: i32) -> bool {
    code == ERROR_INVALID_FUNCTION.0 as i32 || code == ERROR_NOT_SUPPORTED.0 as i32
}
