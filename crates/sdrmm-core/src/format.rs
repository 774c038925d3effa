//! Text helpers shared by the human-readable command outcomes

/// Render a duration in seconds as `m:ss`, or `h:mm:ss` from one hour up
pub fn format_duration(total_secs: u64) -> String {
    let seconds = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{}:{:0>2}:{:0>2}", hours, minutes, seconds)
    } else {
        format!("{}:{:0>2}", minutes, seconds)
    }
}

/// Join items as `a`, `a and b`, or `a, b, and c`
pub fn join_with_and<T: std::fmt::Display>(items: &[T]) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_string(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(|item| item.to_string()).collect();
            format!("{}, and {}", head.join(", "), last)
        }
    }
}
