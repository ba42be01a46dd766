use distplan_lib::platform::current_os_arch_id;

pub fn cmd_info() {
  println!("System:");
  match current_os_arch_id() {
    Some(id) => println!("Platform: {}", id),
    _ => println!("Could not detect platform."),
  }
}
