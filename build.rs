//! Build script: embeds the git hash and checks GPU toolkits.
//!
//! whisper-rs-sys fails late and noisily when a GPU toolkit is missing, so
//! the matching feature flags are checked before it starts compiling.

use std::process::Command;

fn main() {
    if let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        && output.status.success()
    {
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=GIT_HASH={}", hash);
    }
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");

    if cfg!(feature = "cuda") {
        require_tool("nvcc", &["--version"], "CUDA toolkit", "https://developer.nvidia.com/cuda-downloads");
    }
    if cfg!(feature = "vulkan") {
        require_tool("vulkaninfo", &["--summary"], "Vulkan SDK", "https://vulkan.lunarg.com/");
    }
    if cfg!(feature = "hipblas") {
        require_tool("rocminfo", &[], "ROCm", "https://rocm.docs.amd.com/");
    }
    if cfg!(feature = "openblas") {
        require_tool("pkg-config", &["--exists", "openblas"], "OpenBLAS", "sudo apt install libopenblas-dev");
    }
}

fn require_tool(program: &str, args: &[&str], toolkit: &str, install: &str) {
    let found = Command::new(program)
        .args(args)
        .status()
        .is_ok_and(|s| s.success());
    if !found {
        panic!(
            "\n\n{toolkit} not found (`{program}` failed).\n\
             Install: {install}\n\
             Or build without GPU support: cargo build --release\n"
        );
    }
    println!("cargo::warning={toolkit} detected");
}
