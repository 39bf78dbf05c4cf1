//! The `Tier` trait: rate limit parameters for one usage tier.

/// Rate limit parameters for a provider usage tier.
///
/// `None` means unlimited / not applicable for that dimension.
pub trait Tier: Send + Sync {
    /// Requests per minute limit.
    fn rpm(&self) -> Option<u32>;

    /// Tokens per minute limit.
    fn tpm(&self) -> Option<u64>;

    /// Requests per day limit.
    fn rpd(&self) -> Option<u32>;

    /// Maximum concurrent requests.
    fn max_concurrent(&self) -> Option<u32>;

    /// Daily quota in USD.
    fn daily_quota_usd(&self) -> Option<f64>;

    /// Cost per million input tokens in USD.
    fn cost_per_million_input_tokens(&self) -> Option<f64>;

    /// Cost per million output tokens in USD.
    fn cost_per_million_output_tokens(&self) -> Option<f64>;

    /// Name of the tier (e.g., "Free", "Pay-as-you-go").
    fn name(&self) -> &str;
}
