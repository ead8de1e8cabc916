//! Text formatting helpers shared by the header generator and the encoders.
//!
//! The numeric formats mirror the C `printf` conversions that consumers of the
//! CSV files expect: `%.15g` for logic timestamps and `%.5f` for amplitudes.

/// Significant digits used for logic timestamps.
pub const TIMESTAMP_PRECISION: usize = 15;

/// Format `value` like C's `%.<precision>g`.
///
/// Uses scientific notation when the decimal exponent is below -4 or not
/// below `precision`, fixed notation otherwise. Trailing zeros of the
/// fraction are removed in both cases, and the exponent has at least two
/// digits.
///
/// ```
/// use trace_csv::format::general;
///
/// assert_eq!(general(0.0, 15), "0");
/// assert_eq!(general(1e-6, 15), "1e-06");
/// assert_eq!(general(0.25, 15), "0.25");
/// assert_eq!(general(123456.0, 3), "1.23e+05");
/// ```
pub fn general(value: f64, precision: usize) -> String {
    let precision = precision.max(1);

    if value.is_nan() {
        return String::from("nan");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "inf" } else { "-inf" });
    }
    if value == 0.0 {
        return String::from(if value.is_sign_negative() { "-0" } else { "0" });
    }

    // Round to the requested significant digits first; the exponent of the
    // rounded value decides the notation.
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Format an amplitude with exactly five fractional digits (`%.5f`).
#[inline]
pub fn fixed5(value: f64) -> String {
    format!("{value:.5}")
}

/// Human readable sample rate, e.g. `1 MHz`, `1.5 kHz` or `0 Hz`.
///
/// ```
/// use trace_csv::format::samplerate_string;
///
/// assert_eq!(samplerate_string(1_000_000), "1 MHz");
/// assert_eq!(samplerate_string(1_500), "1.5 kHz");
/// ```
pub fn samplerate_string(samplerate: u64) -> String {
    si_string(samplerate, "Hz")
}

/// Format `value` with a decimal SI prefix, keeping every significant digit.
fn si_string(value: u64, unit: &str) -> String {
    const DIVISORS: [u64; 7] = [
        1,
        1_000,
        1_000_000,
        1_000_000_000,
        1_000_000_000_000,
        1_000_000_000_000_000,
        1_000_000_000_000_000_000,
    ];
    const PREFIXES: [&str; 7] = ["", "k", "M", "G", "T", "P", "E"];

    let mut i = 0;
    while i + 1 < DIVISORS.len() && value / DIVISORS[i] >= 1000 {
        i += 1;
    }

    let quot = value / DIVISORS[i];
    let mut fract = String::new();
    if i > 0 {
        let digits = format!("{:0width$}", value % DIVISORS[i], width = i * 3);
        let digits = digits.trim_end_matches('0');
        if !digits.is_empty() {
            fract.push('.');
            fract.push_str(digits);
        }
    }

    format!("{quot}{fract} {}{unit}", PREFIXES[i])
}

/// Human readable sample count using binary multiples, e.g. `16 K` or `1 M`.
///
/// Counts below 1024 are printed as plain numbers.
pub fn samplecount_string(count: u64) -> String {
    const KB: u64 = 1 << 10;
    const MB: u64 = 1 << 20;
    const GB: u64 = 1 << 30;

    if count >= GB {
        format!("{} G", count / GB)
    } else if count >= MB {
        format!("{} M", count / MB)
    } else if count >= KB {
        format!("{} K", count / KB)
    } else {
        count.to_string()
    }
}
