// Sign, verify and encrypt against the XSign device through the api module
//
// Run with: HSM_DEVICE_CONFIG=<config> cargo run --example sign_verify --features xsign
//
// Note: This demo requires the XSign library and a configured device

use hsm_sm2::api;
use hsm_sm2::sm2::elliptic_curve::sec1::ToEncodedPoint;
use tracing::info;

const LABEL: &str = "demo-sign-verify";
const PIN: &str = "1234";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = std::env::var("HSM_DEVICE_CONFIG").unwrap_or_else(|_| "cfg".to_string());

    info!("Device version {:#X}", api::get_version()?);

    let public_key = api::generate_key(&config, LABEL, PIN)?;
    info!(
        "Public key: {}",
        hex::encode(public_key.to_encoded_point(false).as_bytes())
    );

    let message = b"hello";
    let signature = api::sign(&config, LABEL, PIN, message)?;
    info!("Signature: {}", hex::encode(signature.as_bytes()));

    let valid = api::verify(&config, message, signature.as_bytes(), &public_key)?;
    let tampered = api::verify(&config, b"hellO", signature.as_bytes(), &public_key)?;
    info!("Verify original: {}, verify tampered: {}", valid, tampered);

    let ciphertext = api::asymmetric_encrypt(&config, b"0123456789", &public_key)?;
    let plaintext = api::asymmetric_decrypt(&config, LABEL, PIN, &ciphertext)?;
    info!(
        "Encrypted {} bytes, decrypted {:?}",
        ciphertext.len(),
        String::from_utf8_lossy(&plaintext)
    );

    api::delete_key(&config, LABEL)?;
    anyhow::ensure!(valid && !tampered, "signature check gave unexpected results");
    Ok(())
}
