//! # 人类可读格式化
//!
//! 时长与字节数的纯函数格式化。
//!
//! ## 依赖关系
//! - 被 `batch/aggregator.rs` 使用
//! - 无外部模块依赖

const KB: u64 = 1 << 10;
const MB: u64 = 1 << 20;
const GB: u64 = 1 << 30;

/// 秒数格式化为 `HH:MM:SS`
///
/// 小时字段至少两位，超过 99 时自然扩展（`100:00:00`）。
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// 字节数格式化: `GB` / `MB` / `KB` 保留一位小数，其余为整数 `B`
///
/// 小数部分以整数定点运算四舍五入（half away from zero）。
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= GB {
        format!("{} GB", one_decimal(bytes, GB))
    } else if bytes >= MB {
        format!("{} MB", one_decimal(bytes, MB))
    } else if bytes >= KB {
        format!("{} KB", one_decimal(bytes, KB))
    } else {
        format!("{} B", bytes)
    }
}

/// 字节速率，如 `1.5 MB/s`
pub fn format_rate(bytes_per_sec: u64) -> String {
    format!("{}/s", format_bytes(bytes_per_sec))
}

fn one_decimal(bytes: u64, unit: u64) -> String {
    let unit = unit as u128;
    let tenths = (bytes as u128 * 10 + unit / 2) / unit;
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(86399), "23:59:59");
        assert_eq!(format_duration(360_000), "100:00:00");
    }

    #[test]
    fn test_format_bytes_boundaries() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1_048_575), "1024.0 KB");
        assert_eq!(format_bytes(1_048_576), "1.0 MB");
        assert_eq!(format_bytes(1_073_741_823), "1024.0 MB");
        assert_eq!(format_bytes(1_073_741_824), "1.0 GB");
    }

    #[test]
    fn test_format_bytes_rounding() {
        // 1.25 KB -> 1.3
        assert_eq!(format_bytes(1280), "1.3 KB");
        // 1.5 KB
        assert_eq!(format_bytes(1536), "1.5 KB");
        // 1.04 KB -> 1.0
        assert_eq!(format_bytes(1065), "1.0 KB");
        assert_eq!(format_bytes(5 * GB + GB / 2), "5.5 GB");
        assert_eq!(format_bytes(u64::MAX), "17179869184.0 GB");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(2048), "2.0 KB/s");
        assert_eq!(format_rate(0), "0 B/s");
    }
}
