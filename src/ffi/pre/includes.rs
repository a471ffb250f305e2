use crate::ffi::utils::cpp;

cpp! {{
    #include <cstdint>
    #include <mutex>
    #include <new>
    #include <string>
}}

cpp! {{
    #include <cuda_runtime.h>
}}

cpp! {{
    #include <NvInfer.h>
    #include <NvInferPlugin.h>
    #include <NvOnnxParser.h>

    static_assert(NV_TENSORRT_MAJOR == 8, "trt-builder requires the TensorRT 8 headers");
}}

cpp! {{
    using namespace nvinfer1;
    using namespace nvonnxparser;
}}
