//! Shared helpers for facts parsing and attribute diffing.
//!
//! Interface-name normalization is the identity backbone of the engine: a
//! `want` record spelled `gi0/1` must land on the same key as a `have` record
//! parsed from `GigabitEthernet0/1`, or the diff silently misses the match.

/// Canonical IOS-family interface prefixes, in match-priority order.
///
/// Abbreviation matching picks the first canonical name that starts with the
/// supplied alphabetic prefix, so ambiguous one-letter prefixes resolve to
/// the entry listed first (`t` is TenGigabitEthernet, not Tunnel).
const IOS_INTERFACE_KINDS: &[&str] = &[
    "GigabitEthernet",
    "TenGigabitEthernet",
    "TwentyFiveGigE",
    "FastEthernet",
    "FortyGigabitEthernet",
    "HundredGigE",
    "Ethernet",
    "Loopback",
    "Port-channel",
    "Serial",
    "Tunnel",
    "Vlan",
];

/// Split an interface spelling into its alphabetic prefix and the
/// number/slot suffix, dropping any whitespace between the two.
fn split_interface_name(name: &str) -> (String, String) {
    let trimmed = name.trim();
    let split_at = trimmed
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let prefix: String = trimmed[..split_at].trim().to_string();
    let suffix: String = trimmed[split_at..].split_whitespace().collect();
    (prefix, suffix)
}

/// Resolve an IOS interface spelling to its canonical kind, if recognized.
pub fn ios_interface_kind(name: &str) -> Option<&'static str> {
    let (prefix, _) = split_interface_name(name);
    if prefix.is_empty() {
        return None;
    }
    let prefix = prefix.to_ascii_lowercase();
    IOS_INTERFACE_KINDS
        .iter()
        .find(|kind| kind.to_ascii_lowercase().starts_with(&prefix))
        .copied()
}

/// Normalize an IOS interface spelling to its canonical form.
///
/// `gi0/1`, `Gi 0/1` and `GigabitEthernet0/1` all normalize to
/// `GigabitEthernet0/1`. Unrecognized spellings are returned trimmed but
/// otherwise untouched; the facts layer drops those blocks.
pub fn normalize_interface(name: &str) -> String {
    let (_, suffix) = split_interface_name(name);
    match ios_interface_kind(name) {
        Some(kind) => format!("{kind}{suffix}"),
        None => name.trim().to_string(),
    }
}

/// Resolve a VyOS interface name (`eth0`, `bond1`) to its config-tree type
/// keyword (`ethernet`, `bonding`), if recognized.
pub fn vyos_interface_type(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_ascii_lowercase();
    let table: &[(&str, &str)] = &[
        ("eth", "ethernet"),
        ("bond", "bonding"),
        ("lo", "loopback"),
        ("vti", "vti"),
        ("vxlan", "vxlan"),
    ];
    table
        .iter()
        .find(|(prefix, _)| lower.starts_with(prefix))
        .map(|(_, kind)| *kind)
}

/// Extract the value that follows `arg` on a configuration line.
///
/// Tolerant extractor: returns `None` when the attribute is absent. Matches
/// only lines that begin with `arg` (after indentation), so `no description`
/// never matches a `description` lookup. Surrounding quotes are stripped.
pub fn parse_conf_arg(conf: &str, arg: &str) -> Option<String> {
    for line in conf.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix(arg) {
            if let Some(value) = rest.strip_prefix(' ') {
                let value = value.trim().trim_matches('\'').trim_matches('"');
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Whether a configuration block contains `cmd` as a standalone line.
pub fn has_conf_line(conf: &str, cmd: &str) -> bool {
    conf.lines().any(|line| line.trim() == cmd)
}

/// Find a record by key in a list (identity matching is always by key,
/// never positional).
pub fn find_by_key<'a, T>(
    key: &str,
    list: &'a [T],
    key_of: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    list.iter().find(|item| key_of(item) == key)
}

/// Elements present in `want` but not in `have` (set difference).
pub fn list_diff_want_only<'a, T: PartialEq>(want: &'a [T], have: &[T]) -> Vec<&'a T> {
    want.iter().filter(|item| !have.contains(item)).collect()
}

/// Elements present in `have` but not in `want` (set difference).
pub fn list_diff_have_only<'a, T: PartialEq>(want: &[T], have: &'a [T]) -> Vec<&'a T> {
    have.iter().filter(|item| !want.contains(item)).collect()
}

/// Parse a VLAN range string (`1,10-12,20`) into the expanded id list.
///
/// Malformed fragments are skipped; order follows the source string.
pub fn parse_vlan_range(value: &str) -> Vec<u16> {
    let mut vlans = Vec::new();
    for part in value.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((start, end)) = part.split_once('-') {
            if let (Ok(start), Ok(end)) = (start.trim().parse::<u16>(), end.trim().parse::<u16>())
            {
                if start <= end {
                    vlans.extend(start..=end);
                }
            }
        } else if let Ok(id) = part.parse::<u16>() {
            vlans.push(id);
        }
    }
    vlans
}

/// Render a VLAN id list as the compact device range string (`1-3,10`).
///
/// Ids are sorted and deduplicated; consecutive runs collapse to ranges.
pub fn vlan_range_to_string(vlans: &[u16]) -> String {
    let mut sorted: Vec<u16> = vlans.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut parts: Vec<String> = Vec::new();
    let mut run: Option<(u16, u16)> = None;
    for &id in &sorted {
        run = match run {
            Some((start, end)) if id == end + 1 => Some((start, id)),
            Some((start, end)) => {
                parts.push(format_run(start, end));
                Some((id, id))
            }
            None => Some((id, id)),
        };
    }
    if let Some((start, end)) = run {
        parts.push(format_run(start, end));
    }
    parts.join(",")
}

/// Convert a dotted-quad netmask (`255.255.255.0`) to a prefix length.
///
/// Returns `None` for anything that is not a contiguous mask.
pub fn netmask_to_masklen(netmask: &str) -> Option<u8> {
    let mut bits: u32 = 0;
    let mut octets = 0;
    for part in netmask.split('.') {
        bits = (bits << 8) | u32::from(part.parse::<u8>().ok()?);
        octets += 1;
    }
    if octets != 4 {
        return None;
    }
    let len = bits.leading_ones();
    if bits.checked_shl(len).unwrap_or(0) != 0 {
        return None;
    }
    Some(len as u8)
}

/// Convert a prefix length to the dotted-quad netmask IOS expects.
pub fn masklen_to_netmask(masklen: u8) -> String {
    let bits: u32 = if masklen == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(masklen.min(32)))
    };
    format!(
        "{}.{}.{}.{}",
        bits >> 24,
        (bits >> 16) & 0xff,
        (bits >> 8) & 0xff,
        bits & 0xff
    )
}

fn format_run(start: u16, end: u16) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_abbreviations() {
        assert_eq!(normalize_interface("gi0/1"), "GigabitEthernet0/1");
        assert_eq!(normalize_interface("Gi 0/1"), "GigabitEthernet0/1");
        assert_eq!(normalize_interface("GigabitEthernet0/1"), "GigabitEthernet0/1");
        assert_eq!(normalize_interface("te1/0/1"), "TenGigabitEthernet1/0/1");
        assert_eq!(normalize_interface("fa0/0"), "FastEthernet0/0");
        assert_eq!(normalize_interface("po10"), "Port-channel10");
        assert_eq!(normalize_interface("lo0"), "Loopback0");
        assert_eq!(normalize_interface("vl100"), "Vlan100");
    }

    #[test]
    fn test_normalize_keeps_subinterface_suffix() {
        assert_eq!(normalize_interface("gi0/1.100"), "GigabitEthernet0/1.100");
    }

    #[test]
    fn test_normalize_unknown_passthrough() {
        assert_eq!(normalize_interface("  mgmt0 "), "mgmt0");
        assert!(ios_interface_kind("mgmt0").is_none());
    }

    #[test]
    fn test_vyos_interface_type() {
        assert_eq!(vyos_interface_type("eth0"), Some("ethernet"));
        assert_eq!(vyos_interface_type("bond1"), Some("bonding"));
        assert_eq!(vyos_interface_type("wlan0"), None);
    }

    #[test]
    fn test_parse_conf_arg() {
        let conf = " description test interface\n mtu 1500\n no shutdown";
        assert_eq!(
            parse_conf_arg(conf, "description").as_deref(),
            Some("test interface")
        );
        assert_eq!(parse_conf_arg(conf, "mtu").as_deref(), Some("1500"));
        assert_eq!(parse_conf_arg(conf, "shutdown"), None);
        assert_eq!(parse_conf_arg(conf, "speed"), None);
    }

    #[test]
    fn test_parse_conf_arg_strips_quotes() {
        let conf = " eth0 description 'uplink to core'";
        assert_eq!(
            parse_conf_arg(conf, "eth0 description").as_deref(),
            Some("uplink to core")
        );
    }

    #[test]
    fn test_list_diffs() {
        let want = vec![10u16, 20, 30];
        let have = vec![20u16, 40];
        assert_eq!(list_diff_want_only(&want, &have), vec![&10, &30]);
        assert_eq!(list_diff_have_only(&want, &have), vec![&40]);
    }

    #[test]
    fn test_vlan_range_round_trip() {
        assert_eq!(parse_vlan_range("1,10-12,20"), vec![1, 10, 11, 12, 20]);
        assert_eq!(vlan_range_to_string(&[12, 10, 1, 11, 20]), "1,10-12,20");
        assert_eq!(vlan_range_to_string(&[5]), "5");
        assert_eq!(vlan_range_to_string(&[]), "");
    }

    #[test]
    fn test_parse_vlan_range_skips_malformed() {
        assert_eq!(parse_vlan_range("10,du-mmy,30"), vec![10, 30]);
    }

    #[test]
    fn test_netmask_conversion() {
        assert_eq!(netmask_to_masklen("255.255.255.0"), Some(24));
        assert_eq!(netmask_to_masklen("255.255.255.255"), Some(32));
        assert_eq!(netmask_to_masklen("0.0.0.0"), Some(0));
        assert_eq!(netmask_to_masklen("255.0.255.0"), None);
        assert_eq!(netmask_to_masklen("255.255.255"), None);
        assert_eq!(masklen_to_netmask(24), "255.255.255.0");
        assert_eq!(masklen_to_netmask(19), "255.255.224.0");
        assert_eq!(masklen_to_netmask(0), "0.0.0.0");
    }
}
