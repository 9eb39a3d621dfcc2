//! Parsing of netlist `src` location strings, e.g. `"top.v:42.3-42.10"`.

/// Splits a `src` attribute into `(file, line)`. Only the file and the
/// first line number are extracted; column ranges are discarded. Malformed
/// input yields `(None, None)` rather than an error — provenance is
/// best-effort, never load-bearing for correctness.
pub fn parse_src(src: &str) -> (Option<String>, Option<u32>) {
    let Some((file, rest)) = src.split_once(':') else {
        return (None, None);
    };
    if file.is_empty() {
        return (None, None);
    }
    let line_prefix: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let line = line_prefix.parse::<u32>().ok();
    (Some(file.to_string()), line)
}
