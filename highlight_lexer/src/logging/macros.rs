//! Logging macros routed through the global logging service
//!
//! Context values accept any `Display` type:
//! `log_error!(code, "msg", span = s, "pattern" => pat)`.

/// Log an error with a code, optional span, and context pairs
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogEvent::error($code, $message).with_span($span),
            vec![$(($key, format!("{}", $value))),*],
        )
    };

    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogEvent::error($code, $message),
            vec![$(($key, format!("{}", $value))),*],
        )
    };
}

/// Log a success event with a code and context pairs
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogEvent::success($code, $message),
            vec![$(($key, format!("{}", $value))),*],
        )
    };
}

/// Log an informational message
#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogEvent::info($message),
            vec![$(($key, format!("{}", $value))),*],
        )
    };
}

/// Log a warning, optionally with a dedicated code and span
#[macro_export]
macro_rules! log_warning {
    (code = $code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogEvent::warning_with_code($code, $message).with_span($span),
            vec![$(($key, format!("{}", $value))),*],
        )
    };

    (code = $code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogEvent::warning_with_code($code, $message),
            vec![$(($key, format!("{}", $value))),*],
        )
    };

    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogEvent::warning($message),
            vec![$(($key, format!("{}", $value))),*],
        )
    };
}

/// Log a debug message; context is only formatted when debug output is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            $crate::logging::emit(
                $crate::logging::LogEvent::debug($message),
                vec![$(($key, format!("{}", $value))),*],
            )
        }
    };
}

/// Success event carrying elapsed milliseconds
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::log_success!($code, $message,
            "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0)
            $(, $key => $value)*
        )
    };
}
