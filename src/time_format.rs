const MS_PER_SEC: u64 = 1000;
const MS_PER_MIN: u64 = 60 * MS_PER_SEC;
const MS_PER_HOUR: u64 = 60 * MS_PER_MIN;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Format a duration for display, truncated to hundredths of a second.
///
/// Zero-valued leading units are dropped: `S.CC`, `M:SS.CC` or
/// `H:MM:SS.CC`. Hours wrap at one day.
pub fn format_duration(ms: u64) -> String {
    let hours = (ms % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MIN;
    let seconds = (ms % MS_PER_MIN) / MS_PER_SEC;
    let centis = (ms % MS_PER_SEC) / 10;

    match (hours, minutes) {
        (0, 0) => format!("{seconds}.{centis:02}"),
        (0, _) => format!("{minutes}:{seconds:02}.{centis:02}"),
        _ => format!("{hours}:{minutes:02}:{seconds:02}.{centis:02}"),
    }
}
