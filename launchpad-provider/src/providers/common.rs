//! Provider 公共工具函数

/// 去掉域名末尾的点并转为小写
pub fn normalize_domain_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Compare two host names the way DNS does (case-insensitive, trailing dot ignored).
pub fn same_host(a: &str, b: &str) -> bool {
    normalize_domain_name(a) == normalize_domain_name(b)
}

/// 将相对名称转换为完整域名
/// 如: "www" + "example.com" -> "www.example.com"
/// 如: "@" + "example.com" -> "example.com"
pub fn relative_to_full_name(relative_name: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);

    if relative_name == "@" || relative_name.is_empty() {
        zone
    } else if same_host(relative_name, &zone)
        || normalize_domain_name(relative_name).ends_with(&format!(".{zone}"))
    {
        normalize_domain_name(relative_name)
    } else {
        format!("{}.{zone}", normalize_domain_name(relative_name))
    }
}

/// Project-safe slug for a domain: `shop.example.com` -> `shop-example-com`.
pub fn slugify_domain(name: &str) -> String {
    let slug: String = normalize_domain_name(name)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    slug.trim_matches('-').chars().take(100).collect()
}
