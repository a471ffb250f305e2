#[cfg(unix)]
fn main() {
    handle_docs_rs();

    let cuda_path = std::env::var("CUDA_PATH").unwrap_or_else(|_| "/usr/local/cuda".to_string());

    let cuda_include_path =
        std::env::var("CUDA_INCLUDE_PATH").unwrap_or_else(|_| format!("{cuda_path}/include"));

    let cuda_lib_path =
        std::env::var("CUDA_LIB_PATH").unwrap_or_else(|_| format!("{cuda_path}/lib64"));

    // Debian packages put TensorRT next to the system headers and libraries, tarball installs
    // usually need both variables set.
    let tensorrt_include_path = std::env::var("TENSORRT_INCLUDE_PATH")
        .unwrap_or_else(|_| "/usr/include/x86_64-linux-gnu".to_string());

    let tensorrt_lib_path = std::env::var("TENSORRT_LIB_PATH")
        .unwrap_or_else(|_| "/usr/lib/x86_64-linux-gnu".to_string());

    cpp_build::Config::new()
        .include(cuda_include_path)
        .include(tensorrt_include_path)
        .build("src/lib.rs");

    println!("cargo:rustc-link-search={cuda_lib_path}");
    println!("cargo:rustc-link-search={tensorrt_lib_path}");
    link_libraries();
}

#[cfg(windows)]
fn main() {
    handle_docs_rs();
    let cuda_path = std::env::var("CUDA_PATH").expect("Missing environment variable `CUDA_PATH`.");
    let cuda_path = std::path::Path::new(&cuda_path);
    let tensorrt_path = std::env::var("TENSORRT_PATH")
        .expect("Missing environment variable `TENSORRT_PATH`.");
    let tensorrt_path = std::path::Path::new(&tensorrt_path);
    cpp_build::Config::new()
        .include(cuda_path.join("include"))
        .include(tensorrt_path.join("include"))
        .build("src/lib.rs");
    println!(
        "cargo:rustc-link-search={}",
        cuda_path.join("lib").join("x64").display()
    );
    println!(
        "cargo:rustc-link-search={}",
        tensorrt_path.join("lib").display()
    );
    link_libraries();
}

fn link_libraries() {
    println!("cargo:rustc-link-lib=cudart");
    println!("cargo:rustc-link-lib=nvinfer");
    println!("cargo:rustc-link-lib=nvinfer_plugin");
    println!("cargo:rustc-link-lib=nvonnxparser");
}

fn handle_docs_rs() {
    println!("cargo:rustc-check-cfg=cfg(no_native_deps)");
    if std::env::var("DOCS_RS").is_ok() {
        println!("cargo:rustc-cfg=no_native_deps");
        std::process::exit(0);
    }
}
