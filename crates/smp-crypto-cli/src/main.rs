//! Command-line interface for `smp-crypto`.
//!
//! Values are read and printed in the Core Specification's notation: hex, most significant
//! octet first. Signed data is the exception and is taken in transmission order.

#![forbid(unsafe_code)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use smp_crypto::{
    address, aes_cmac, f4, f5, f6, fixed, g2, h6, h7, io_cap, key_id, link_key_to_ltk,
    ltk_to_link_key, sign, tag_salt, AddressType, Octet16, Octet32,
};

/// Bluetooth pairing crypto CLI.
#[derive(Parser)]
#[command(
    name = "smp-crypto",
    version,
    author,
    about = "AES-CMAC and Security Manager key derivation functions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// AES-CMAC of a message.
    Cmac {
        /// 128-bit key.
        #[arg(long, value_name = "HEX")]
        key: String,
        /// Message (may be empty).
        #[arg(long, value_name = "HEX", default_value = "")]
        message: String,
    },
    /// h6(W, keyID).
    H6 {
        /// 128-bit key W.
        #[arg(long, value_name = "HEX")]
        w: String,
        /// Four-character ASCII key ID, e.g. `lebr`.
        #[arg(long)]
        key_id: String,
    },
    /// h7(SALT, W).
    H7 {
        /// 128-bit salt.
        #[arg(long, value_name = "HEX")]
        salt: String,
        /// 128-bit key W.
        #[arg(long, value_name = "HEX")]
        w: String,
    },
    /// f4(U, V, X, Z) confirm value.
    F4 {
        /// 256-bit U.
        #[arg(long, value_name = "HEX")]
        u: String,
        /// 256-bit V.
        #[arg(long, value_name = "HEX")]
        v: String,
        /// 128-bit X.
        #[arg(long, value_name = "HEX")]
        x: String,
        /// Z octet.
        #[arg(long, default_value_t = 0)]
        z: u8,
    },
    /// f5(W, N1, N2, A1, A2) MacKey and LTK.
    F5 {
        /// 256-bit DHKey W.
        #[arg(long, value_name = "HEX")]
        w: String,
        /// 128-bit N1.
        #[arg(long, value_name = "HEX")]
        n1: String,
        /// 128-bit N2.
        #[arg(long, value_name = "HEX")]
        n2: String,
        /// 56-bit A1 (type octet then address).
        #[arg(long, value_name = "HEX")]
        a1: String,
        /// 56-bit A2 (type octet then address).
        #[arg(long, value_name = "HEX")]
        a2: String,
    },
    /// f6(W, N1, N2, R, IOcap, A1, A2) DHKey check.
    F6 {
        /// 128-bit MacKey W.
        #[arg(long, value_name = "HEX")]
        w: String,
        /// 128-bit N1.
        #[arg(long, value_name = "HEX")]
        n1: String,
        /// 128-bit N2.
        #[arg(long, value_name = "HEX")]
        n2: String,
        /// 128-bit R.
        #[arg(long, value_name = "HEX")]
        r: String,
        /// 24-bit IOcap.
        #[arg(long, value_name = "HEX")]
        iocap: String,
        /// 56-bit A1.
        #[arg(long, value_name = "HEX")]
        a1: String,
        /// 56-bit A2.
        #[arg(long, value_name = "HEX")]
        a2: String,
    },
    /// g2(U, V, X, Y) six-digit numeric comparison value.
    G2 {
        /// 256-bit U.
        #[arg(long, value_name = "HEX")]
        u: String,
        /// 256-bit V.
        #[arg(long, value_name = "HEX")]
        v: String,
        /// 128-bit X.
        #[arg(long, value_name = "HEX")]
        x: String,
        /// 128-bit Y.
        #[arg(long, value_name = "HEX")]
        y: String,
    },
    /// Derive a BR/EDR link key from an LE LTK.
    LtkToLinkKey {
        /// 128-bit LTK.
        #[arg(long, value_name = "HEX")]
        ltk: String,
        /// Use h7 for the intermediate key (CT2 set on both sides).
        #[arg(long, default_value_t = false)]
        h7: bool,
    },
    /// Derive an LE LTK from a BR/EDR link key.
    LinkKeyToLtk {
        /// 128-bit link key.
        #[arg(long, value_name = "HEX")]
        link_key: String,
        /// Use h7 for the intermediate key (CT2 set on both sides).
        #[arg(long, default_value_t = false)]
        h7: bool,
    },
    /// Sign data with a CSRK and print the 12-octet signature.
    Sign {
        /// 128-bit CSRK.
        #[arg(long, value_name = "HEX")]
        csrk: String,
        /// Data to sign, in transmission order.
        #[arg(long, value_name = "HEX")]
        data: String,
        /// Sign counter.
        #[arg(long, default_value_t = 0)]
        counter: u32,
    },
    /// Check every function against the published sample data.
    Selftest,
    /// Run a simulated LE Secure Connections numeric comparison key derivation.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Cmac { key, message } => {
            let key: Octet16 = parse_value("key", &key)?;
            let message = parse_message(&message)?;
            println!("{}", msb_hex(&aes_cmac(&key, &message)));
        }
        Commands::H6 { w, key_id: tag } => {
            let w: Octet16 = parse_value("W", &w)?;
            let tag: [u8; 4] = fixed("key ID", tag.as_bytes())?;
            println!("{}", msb_hex(&h6(&w, &key_id(&tag))));
        }
        Commands::H7 { salt, w } => {
            let salt: Octet16 = parse_value("SALT", &salt)?;
            let w: Octet16 = parse_value("W", &w)?;
            println!("{}", msb_hex(&h7(&salt, &w)));
        }
        Commands::F4 { u, v, x, z } => {
            let u: Octet32 = parse_value("U", &u)?;
            let v: Octet32 = parse_value("V", &v)?;
            let x: Octet16 = parse_value("X", &x)?;
            println!("{}", msb_hex(&f4(&u, &v, &x, z)));
        }
        Commands::F5 { w, n1, n2, a1, a2 } => {
            let (mac_key, ltk) = f5(
                &parse_value("W", &w)?,
                &parse_value("N1", &n1)?,
                &parse_value("N2", &n2)?,
                &parse_value("A1", &a1)?,
                &parse_value("A2", &a2)?,
            );
            println!("mac_key: {}", msb_hex(&mac_key));
            println!("ltk: {}", msb_hex(&ltk));
        }
        Commands::F6 {
            w,
            n1,
            n2,
            r,
            iocap,
            a1,
            a2,
        } => {
            let check = f6(
                &parse_value("W", &w)?,
                &parse_value("N1", &n1)?,
                &parse_value("N2", &n2)?,
                &parse_value("R", &r)?,
                &parse_value("IOcap", &iocap)?,
                &parse_value("A1", &a1)?,
                &parse_value("A2", &a2)?,
            );
            println!("{}", msb_hex(&check));
        }
        Commands::G2 { u, v, x, y } => {
            let value = g2(
                &parse_value("U", &u)?,
                &parse_value("V", &v)?,
                &parse_value("X", &x)?,
                &parse_value("Y", &y)?,
            );
            println!("{value:06}");
        }
        Commands::LtkToLinkKey { ltk, h7 } => {
            let ltk: Octet16 = parse_value("LTK", &ltk)?;
            println!("{}", msb_hex(&ltk_to_link_key(&ltk, h7)));
        }
        Commands::LinkKeyToLtk { link_key, h7 } => {
            let link_key: Octet16 = parse_value("link key", &link_key)?;
            println!("{}", msb_hex(&link_key_to_ltk(&link_key, h7)));
        }
        Commands::Sign {
            csrk,
            data,
            counter,
        } => {
            let csrk: Octet16 = parse_value("CSRK", &csrk)?;
            let data = hex::decode(strip(&data)).context("decode data hex")?;
            println!("{}", hex::encode(sign(&csrk, &data, counter).to_bytes()));
        }
        Commands::Selftest => cmd_selftest()?,
        Commands::Demo { seed } => cmd_demo(seed)?,
    }
    Ok(())
}

/// Sample data from Vol 3, Part H, Appendix D, and RFC 4493.
fn cmd_selftest() -> Result<()> {
    const U: &str = "20b003d2f297be2c5e2c83a7e9f9a5b9eff49111acf4fddbcc0301480e359de6";
    const V: &str = "55188b3d32f6bb9a900afcfbeed4e72a59cb9ac2f19d7cfb6b4fdd49f47fc5fd";
    const X: &str = "d5cb8454d177733effffb2ec712baeab";
    const Y: &str = "a6e8e7cc25a75f6e216583f7ff3dc4cf";
    const W: &str = "ec0234a357c8ad05341010a60a397d9b99796b13b4f866f1868d34f373bfa698";
    const A1: &str = "00561237 37bfce";
    const A2: &str = "00a71370 2dcfc1";
    const MAC_KEY: &str = "2965f176a1084a02fd3f6a20ce636e20";
    const LTK: &str = "368df9bce3264b58bd066c33334fbf64";
    const LINK_KEY: &str = "05040302010009080706050403020100";

    let (mac_key, ltk) = f5(
        &parse_value("W", W)?,
        &parse_value("N1", X)?,
        &parse_value("N2", Y)?,
        &parse_value("A1", A1)?,
        &parse_value("A2", A2)?,
    );
    let h6_w: Octet16 = parse_value("W", &W[..32])?;
    let rfc_key: Octet16 = parse_value("key", "2b7e151628aed2a6abf7158809cf4f3c")?;

    let checks = [
        (
            "aes_cmac (empty)",
            msb_hex(&aes_cmac(&rfc_key, &[])),
            "bb1d6929e95937287fa37d129b756746",
        ),
        (
            "aes_cmac (16 octets)",
            msb_hex(&aes_cmac(
                &rfc_key,
                &parse_message("6bc1bee22e409f96e93d7e117393172a")?,
            )),
            "070a16b46b4d4144f79bdd9dd04a287c",
        ),
        (
            "f4",
            msb_hex(&f4(
                &parse_value("U", U)?,
                &parse_value("V", V)?,
                &parse_value("X", X)?,
                0,
            )),
            "f2c916f107a9bd1cf1eda1bea974872d",
        ),
        ("f5 MacKey", msb_hex(&mac_key), MAC_KEY),
        (
            "f5 LTK",
            msb_hex(&ltk),
            "6986791169d7cd23980522b594750a38",
        ),
        (
            "f6",
            msb_hex(&f6(
                &parse_value("W", MAC_KEY)?,
                &parse_value("N1", X)?,
                &parse_value("N2", Y)?,
                &parse_value("R", "12a3343bb453bb5408da42d20c2d0fc8")?,
                &io_cap(0x01, true, 0x02),
                &parse_value("A1", A1)?,
                &parse_value("A2", A2)?,
            )),
            "e3c473989cd0e8c5d26c0b09da958f61",
        ),
        (
            "g2",
            format!(
                "{:06}",
                g2(
                    &parse_value("U", U)?,
                    &parse_value("V", V)?,
                    &parse_value("X", X)?,
                    &parse_value("Y", Y)?,
                )
            ),
            "938554",
        ),
        (
            "h6",
            msb_hex(&h6(&h6_w, &key_id(b"lebr"))),
            "2d9ae102e76dc91ce8d3a9e280b16399",
        ),
        (
            "h7",
            msb_hex(&h7(&tag_salt(b"tmp1"), &h6_w)),
            "fb173597c6a3c0ecd2998c2a75a57011",
        ),
        (
            "ltk_to_link_key (h6)",
            msb_hex(&ltk_to_link_key(&parse_value("LTK", LTK)?, false)),
            "bc1ca4ef633fc1bd0d8230afee388fb0",
        ),
        (
            "ltk_to_link_key (h7)",
            msb_hex(&ltk_to_link_key(&parse_value("LTK", LTK)?, true)),
            "287ad379dca402530a39f1f43047b835",
        ),
        (
            "link_key_to_ltk (h6)",
            msb_hex(&link_key_to_ltk(&parse_value("link key", LINK_KEY)?, false)),
            "a813fb72f1a3dfa18a2c9a43f10d0a30",
        ),
        (
            "link_key_to_ltk (h7)",
            msb_hex(&link_key_to_ltk(&parse_value("link key", LINK_KEY)?, true)),
            "e85e09eb5eccb3e269418a133211bc79",
        ),
    ];

    let mut failures = 0;
    for (name, actual, expected) in &checks {
        if actual == expected {
            println!("ok    {name}");
        } else {
            println!("FAIL  {name}: got {actual}, expected {expected}");
            failures += 1;
        }
    }
    if failures > 0 {
        bail!("{failures} of {} checks failed", checks.len());
    }
    Ok(())
}

/// Key set produced by one simulated numeric comparison pairing.
#[derive(Debug, PartialEq, Eq)]
struct DemoKeys {
    na: Octet16,
    nb: Octet16,
    cb: Octet16,
    compare: u32,
    mac_key: Octet16,
    ltk: Octet16,
    ea: Octet16,
    eb: Octet16,
    link_key: Octet16,
}

fn derive_demo_keys(rng: &mut impl RngCore) -> DemoKeys {
    // Stand-ins for the P-256 exchange, which happens outside this toolbox.
    let pka_x: Octet32 = random(rng);
    let pkb_x: Octet32 = random(rng);
    let dh_key: Octet32 = random(rng);
    let na: Octet16 = random(rng);
    let nb: Octet16 = random(rng);
    let a = address(&random(rng), AddressType::Public);
    let b = address(&random(rng), AddressType::Random);
    let io_a = io_cap(0x0d, false, 0x01);
    let io_b = io_cap(0x0d, false, 0x01);

    let cb = f4(&pkb_x, &pka_x, &nb, 0);
    let compare = g2(&pka_x, &pkb_x, &na, &nb);

    let (mac_key, ltk) = f5(&dh_key, &na, &nb, &a, &b);
    let r = [0u8; 16];
    let ea = f6(&mac_key, &na, &nb, &r, &io_a, &a, &b);
    let eb = f6(&mac_key, &nb, &na, &r, &io_b, &b, &a);
    let link_key = ltk_to_link_key(&ltk, true);

    DemoKeys {
        na,
        nb,
        cb,
        compare,
        mac_key,
        ltk,
        ea,
        eb,
        link_key,
    }
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    if seed.is_none() {
        println!("no seed given, output is not reproducible");
    }
    let keys = derive_demo_keys(&mut seeded_rng(seed));

    println!("na: {}", msb_hex(&keys.na));
    println!("nb: {}", msb_hex(&keys.nb));
    println!("cb: {}", msb_hex(&keys.cb));
    println!("compare: {:06}", keys.compare);
    println!("mac_key: {}", msb_hex(&keys.mac_key));
    println!("ltk: {}", msb_hex(&keys.ltk));
    println!("ea: {}", msb_hex(&keys.ea));
    println!("eb: {}", msb_hex(&keys.eb));
    println!("link_key: {}", msb_hex(&keys.link_key));
    Ok(())
}

fn strip(hex_str: &str) -> String {
    hex_str.split_whitespace().collect()
}

/// Parses a fixed-width value written most significant octet first.
fn parse_value<const N: usize>(field: &'static str, hex_str: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(strip(hex_str)).with_context(|| format!("decode {field} hex"))?;
    let mut value: [u8; N] = fixed(field, &bytes)?;
    value.reverse();
    Ok(value)
}

fn parse_message(hex_str: &str) -> Result<Vec<u8>> {
    let mut bytes = hex::decode(strip(hex_str)).context("decode message hex")?;
    bytes.reverse();
    Ok(bytes)
}

fn msb_hex(value: &[u8]) -> String {
    let mut bytes = value.to_vec();
    bytes.reverse();
    hex::encode(bytes)
}

fn random<const N: usize>(rng: &mut impl RngCore) -> [u8; N] {
    let mut out = [0u8; N];
    rng.fill_bytes(&mut out);
    out
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}
