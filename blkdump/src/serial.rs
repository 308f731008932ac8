/// Convert macOS /dev/tty.* ports to /dev/cu.* ports
///
/// On macOS, opening a /dev/tty.* port blocks until carrier detect is asserted,
/// so the /dev/cu.* equivalent is used instead
pub fn normalize_port_name(port_name: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        if port_name.starts_with("/dev/tty.") {
            return port_name.replace("/dev/tty.", "/dev/cu.");
        }
    }
    port_name.to_string()
}
