use crate::token::{TokenInfo, TokenTable};
use crate::types::rule::ConversionRule;

/// Mainnet ERC-20 tokens: `(address, decimals, symbol)`.
///
/// Mostly tokens whose precision differs from 18, since unknown addresses
/// already resolve to 18 decimals.
const DEFAULT_TOKENS: &[(&str, u8, &str)] = &[
    ("0x5b7533812759b45c2b44c19e320ba2cd2681b542", 8, "AGIX"),
    ("0x9eead9ce15383caeed975427340b3a369410cfbf", 6, "AlloyUSDT"),
    ("0xd46ba6d942050d489dbd938a2c909a5d5039a161", 9, "AMPL"),
    ("0xdac17f958d2ee523a2206206994597c13d831ec7", 6, "USDT"),
    ("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", 6, "USDC"),
    ("0x2260fac5e5542a773aa44fbcfedf7c193bc2c599", 8, "WBTC"),
    ("0x00000000efe302beaa2b3e6e1b18d08d69a9012a", 6, "AUSD"),
    ("0x9be89d2a4cd102d8fecc6bf9da793be995c22541", 8, "BBTC"),
    ("0x0590cc9232ebf68d81f6707a119898219342ecb9", 9, "BCAT"),
    ("0xbea0000029ad1c77d3d5d23ba2d8893db9d1efab", 6, "BEAN"),
    ("0x72e4f9f808c49a2a61de9c5896298920dc4eeea9", 8, "BITCOIN"),
    ("0x8c41455aaa8d6aba3150058d4964349294bf78a3", 9, "BULL"),
    ("0xcbb7c0000ab88b473b1f5afd9ef808440eed33bf", 8, "CbBTC"),
    ("0xc581b735a1688071a1746c968e0798d642ede491", 6, "EURT"),
    ("0xdb25f211ab05b1c97d595516f45794528a807ad8", 2, "EURS"),
    ("0x1abaea1f7c830bd89acc67ec4af516284b1bc33c", 6, "EURC"),
    ("0xc96de26018a54d51c097160568752c4e3bd6c364", 8, "FBTC"),
    ("0xfd56a3dcfc0690881a466ae432d71bb2db588083", 6, "FLEET"),
    ("0xcf0c122c6b73ff809c693db761e7baebe62b6a2e", 9, "FLOKI"),
    ("0x465a5a630482f3abd6d3b84b39b29b07214d19e5", 8, "FUSDC"),
    ("0xd1d2eb1b1e90b638588728b4130137d262c87cae", 8, "GALA"),
    ("0xe3c408bd53c31c085a1746af401a4042954ff740", 8, "GreenMT"),
    ("0x8390a1da07e376ef7add4be859ba74fb83aa02d5", 9, "GROK"),
    ("0x393f1d49425d94f47b26e591a9d111df5cd61065", 2, "GUA"),
    ("0x056fd409e1d7a124bd7017459dfea2f387b6d5cd", 2, "GUSD"),
    ("0x3819f64f282bf135d62168c1e513280daf905e06", 9, "HDRN"),
    ("0x2b591e99afe9f32eaa6214f7b7629768c40eeb39", 8, "HEX"),
    ("0xb8919522331c59f5c16bdfaa6a121a6e03a91f62", 6, "HOME"),
    ("0x20157dbabbe84e3bbfe68c349d0d44e48ae7b5ad2", 8, "IBTC"),
    ("0xfc4913214444af5c715cc9f7b52655e788a569ed", 9, "ICSA"),
    ("0x1fdd61ef9a5c31b9a2abc7d39c139c779e8412af", 9, "JJ"),
    ("0xceb67a66c2c8a90980da3a50a3f96c07525a26cb", 9, "KABOSU"),
    ("0x96543ef8d2c75c26387c1a319ae69c0bee6f3fe7", 6, "KUJI"),
    ("0x8236a87084f8b84306f72007f36f2618a5634494", 8, "LBTC"),
    ("0x5401b8620e5fb570064ca9114fd1e135fd77d57c", 8, "LBTCv"),
    ("0xc673ef7791724f0dcca38adb47fbb3aef3db6c80", 8, "LiquidBeraBTC"),
    ("0x5f46d540b6ed704c3c8789105f30e075aa900726", 8, "LiquidBTC"),
    ("0x08c6f91e2b681faf5e17227f2a44c307b3c1364c", 6, "LiquidUSD"),
    ("0x08a1c30bbb26425c1031ee9e43fa0b9960742539", 6, "LNDX"),
    ("0x866a2bf4e572cbcf37d5071a7a58503bfb36be1b", 6, "M"),
    ("0x812ba41e071c7b7fa4ebcfb62df5f45f6fa853ee", 9, "Neiro"),
    ("0xb60fdf036f2ad584f79525b5da76c5c531283a1b", 9, "NEMO"),
    ("0xcfeaead4947f0705a14ec42ac3d44129e1ef3ed5", 8, "NOTE"),
    ("0x64aa3364f17a4d01c6f1751fd97c2bd3d7e7f1d5", 9, "OHM"),
    ("0x9e18d5bab2fa94a6a95f509ecb38f8f68322abd3", 9, "OMIKAMI"),
    ("0xd3043d66afe00344c115f7f81d18277c5c718ff8", 6, "OmUSD"),
    ("0xf469fbd2abcd6b9de8e169d128226c0fc90a012e", 8, "PumpBTC"),
    ("0x6c3ea9036406852006290770bedfcaba0e23a0e8", 6, "PYUSD"),
    ("0x690031313d70c2545357f4487c6a3f134c434507", 9, "QQQ"),
    ("0x4123a133ae3c521fd134d7b13a2dec35b56c2463", 8, "QRDO"),
    ("0xeb4c2781e4eba804ce9a9803c67d0893436bb27d", 8, "RenBTC"),
    ("0x2bd1f344a2398340c2b1119da98816ea723f5f0f", 6, "ROME"),
    ("0xa43d9f9982ba219e8cbc442aec1304ad014caaa5", 6, "RsGIF"),
    ("0x526be1c610616be0e8e69893fc6766fddfbada61", 6, "RTBL"),
    ("0xd31a59c85ae9d8edefec411d448f90841571b89c", 9, "SOL"),
    ("0xa670d7237398238de01267472c6f13e5b8010fd1", 6, "SOMM"),
    ("0xe0f63a424a4439cbe457d80e4f4b51ad25b2c56c", 8, "SPX"),
    ("0x7ac168c81f4f3820fa3f22603ce5864d6ab3c547", 8, "StACME"),
    ("0xb60acd2057067dc9ed8c083f5aa227a244044fd6", 9, "StTAO"),
    ("0x8db2350d78abc13f5673a411d4700bcf87864dde", 8, "SwBTC"),
    ("0x0258f474786ddfd37abce6df6bbb1dd5dfc4434a", 8, "ORN"),
    // 18 decimals, listed for their symbols
    ("0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee", 18, "ETH"),
    ("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", 18, "WETH"),
    ("0x7f39c581f595b53c5cb19bd0b3f8da6c935e2ca0", 18, "wstETH"),
    ("0x8f08b70456eb22f6109f57b8fafe862ed28e6040", 18, "KING"),
];

/// The built-in token table.
pub fn default_token_table() -> TokenTable {
    TokenTable::from_entries(
        DEFAULT_TOKENS
            .iter()
            .map(|(address, decimals, symbol)| (*address, TokenInfo::new(*decimals, *symbol))),
    )
}

/// The built-in rule list, covering Uniswap-style `tokenIn`/`tokenOut`
/// quotes and CoW-style `sellToken`/`buyToken` orders.
pub fn default_rules() -> Vec<ConversionRule> {
    vec![
        ConversionRule::new("tokenIn", ["amountIn", "execAmountIn"]),
        ConversionRule::new("tokenOut", ["amountOut", "execAmountOut"]),
        ConversionRule::new("sellToken", ["sellAmount"]),
        ConversionRule::new("buyToken", ["buyAmount"]),
    ]
}
