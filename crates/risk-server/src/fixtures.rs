//! Example payloads served for documentation and manual testing

use serde_json::{Value, json};

pub fn portfolio_examples() -> Value {
    json!({
        "balanced_portfolio": {
            "name": "Balanced Portfolio",
            "description": "Well-diversified portfolio with moderate risk",
            "wallet": "example_wallet_balanced",
            "positions": [
                {"symbol": "SOL", "amount": 10, "value_usd": 2000, "volatility": 0.25},
                {"symbol": "USDC", "amount": 1000, "value_usd": 1000, "volatility": 0.01},
                {"symbol": "RAY", "amount": 100, "value_usd": 300, "volatility": 0.35},
                {"symbol": "BTC", "amount": 0.05, "value_usd": 1500, "volatility": 0.20}
            ],
            "total_value": 4800,
            "leverage_ratio": 1.0
        },
        "concentrated_portfolio": {
            "name": "Concentrated Portfolio",
            "description": "High-risk portfolio with heavy concentration",
            "wallet": "example_wallet_concentrated",
            "positions": [
                {"symbol": "SOL", "amount": 50, "value_usd": 10000, "volatility": 0.25},
                {"symbol": "USDC", "amount": 500, "value_usd": 500, "volatility": 0.01}
            ],
            "total_value": 10500,
            "leverage_ratio": 2.0
        }
    })
}
