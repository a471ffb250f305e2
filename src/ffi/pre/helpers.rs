use crate::ffi::utils::cpp;

cpp! {{
    // TensorRT 8 interfaces are released with `delete`. `destroy` is deprecated.
    template<typename T>
    void release(T* object) {
        delete object;
    }
}}
