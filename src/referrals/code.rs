use rand::Rng;

const CODE_LEN: usize = 8;
const CODE_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Fresh referral code: 8 characters of lowercase base-36.
pub fn generate_referral_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

/// Shareable link a referee follows to land on registration with the code
/// pre-filled.
pub fn referral_link(frontend_url: &str, code: &str) -> String {
    format!(
        "{}/register?referral={}",
        frontend_url.trim_end_matches('/'),
        code
    )
}
