#[cfg(not(no_native_deps))]
pub(crate) use cpp::cpp;

// Documentation builds have neither CUDA nor TensorRT available. The stub swallows C++ snippets and
// panics if any wrapper is actually called.
#[cfg(no_native_deps)]
macro_rules! cpp {
    {{ $($t:tt)* }} => {};
    {$(unsafe)? [$($a:tt)*] -> $ret:ty as $b:tt { $($t:tt)* } } => {
        $crate::ffi::utils::native_stub::unavailable::<$ret>()
    };
    { $($t:tt)* } => {
        $crate::ffi::utils::native_stub::unavailable::<()>()
    };
}

#[cfg(no_native_deps)]
pub(crate) use cpp;

#[cfg(no_native_deps)]
pub(crate) mod native_stub {
    pub fn unavailable<T>() -> T {
        panic!("TensorRT is not linked into documentation builds")
    }
}
