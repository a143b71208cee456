// File: crates/plotkit-skia/build.rs
// Summary: Links the Windows system libraries the prebuilt Skia/ICU binaries expect.

fn main() {
    #[cfg(target_os = "windows")]
    {
        // Needed for RegOpenKeyExW, RegQueryInfoKeyW, etc.
        println!("cargo:rustc-link-lib=advapi32");
    }
}
