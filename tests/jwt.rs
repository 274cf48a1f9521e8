mod common;

use std::time::Duration;

use common::{component, read_jwks, read_key, read_vector, TestResult};
use jose_envelope::{
    crypto::{ec, hmac, none::Unsecured, rsa},
    jwa::{EcDSA, JsonWebSigningAlgorithm, RsassaPkcs1V1_5},
    jwk::{FromJwkError, JsonWebKey, JwkVerifier},
    jws::VerifyError,
    jwt::{
        self, Audience, ExpirationTime, Issuer, MaxAge, NotBefore, StandardClaims, Subject,
        Verifier, VerifierError,
    },
    JsonWebToken,
};
use serde::Deserialize;
use serde_json::json;

const ISSUED_AT: u64 = 1_700_000_000;

fn claims() -> serde_json::Value {
    json!({ "iss": "oauth-server", "aud": ["app"], "exp": ISSUED_AT + 3600 })
}

#[test]
fn hmac_pipeline() -> TestResult {
    let key = hmac::Key::<hmac::Hs256>::new(b"k");
    let compact = JsonWebToken::sign(&key, &claims())?.to_string();
    let token = JsonWebToken::decode(&compact)?;

    let expiration = ExpirationTime::new(Duration::ZERO).at(ISSUED_AT);
    token.verify(&[
        &jwt::Signature::new(&key),
        &Issuer::new("oauth-server"),
        &Audience::new("app"),
        &expiration,
    ])?;

    let err = token
        .verify(&[&jwt::Signature::new(&key), &Issuer::new("other")])
        .unwrap_err();
    assert_eq!(err.index, 1);
    assert!(matches!(
        err.cause,
        VerifierError::IssuerMismatch { ref expected, ref actual }
            if expected == "other" && actual == "oauth-server"
    ));

    let other = hmac::Key::<hmac::Hs256>::new(b"k2");
    let err = token
        .verify(&[&jwt::Signature::new(&other), &Issuer::new("oauth-server")])
        .unwrap_err();
    assert_eq!(err.index, 0);
    let VerifierError::Signature(err) = err.cause else {
        panic!("expected a signature failure");
    };
    assert!(matches!(err.cause, VerifyError::InvalidSignature));

    Ok(())
}

#[test]
fn expired_and_missing_exp() -> TestResult {
    let key = hmac::Key::<hmac::Hs256>::new(b"k");
    let token = JsonWebToken::sign(&key, &claims())?;
    let exp = ISSUED_AT + 3600;

    ExpirationTime::new(Duration::ZERO).at(exp).verify(&token)?;
    assert!(matches!(
        ExpirationTime::new(Duration::ZERO).at(exp + 1).verify(&token),
        Err(VerifierError::Expired { .. })
    ));
    ExpirationTime::new(Duration::from_secs(30))
        .at(exp + 30)
        .verify(&token)?;

    let token = JsonWebToken::sign(&key, &json!({ "iss": "oauth-server" }))?;
    let err = token
        .verify(&[&ExpirationTime::new(Duration::ZERO).at(ISSUED_AT)])
        .unwrap_err();
    assert!(matches!(err.cause, VerifierError::MissingClaim("exp")));

    Ok(())
}

#[test]
fn vectors_verify_against_the_key_set() -> TestResult {
    let set = read_jwks()?;

    for name in ["hs256", "rs256", "es256", "es384", "es512"] {
        let token = JsonWebToken::decode(&read_vector(name)?)?;
        assert_eq!(token.header().typ(), Some("JWT"));

        let alg = token.header().algorithm();
        let key = set
            .find(|key| key.algorithm() == Some(alg))
            .ok_or_else(|| format!("no key for {alg}"))?;
        let verifier = JwkVerifier::try_from(key)?;

        token.verify(&[
            &jwt::Signature::new(&verifier),
            &Issuer::new("oauth-server"),
            &Subject::new("alice"),
            &Audience::new("app"),
            &NotBefore::new(Duration::ZERO).at(ISSUED_AT),
            &ExpirationTime::new(Duration::ZERO),
            &MaxAge::new(Duration::from_secs(60)).at(ISSUED_AT + 60),
        ])?;
    }

    Ok(())
}

#[test]
fn vectors_reject_other_keys() -> TestResult {
    let set = read_jwks()?;
    let es256 = JsonWebToken::decode(&read_vector("es256")?)?;

    for kid in ["hmac", "rsa-2048", "ec-p-384"] {
        let key = set.find_by_key_id(kid).ok_or("missing key")?;
        let verifier = JwkVerifier::try_from(key)?;
        let err = es256
            .verify_signature(&verifier)
            .expect_err("verified with the wrong key");
        assert!(matches!(err.cause, VerifyError::AlgorithmMismatch { .. }));
    }

    // the RSA key is restricted to RS256
    let rsa_jwk = set.find_by_key_id("rsa-2048").ok_or("missing key")?;
    assert!(matches!(
        JwkVerifier::new(rsa_jwk, RsassaPkcs1V1_5::Rs512.into()),
        Err(FromJwkError::AlgorithmHintMismatch { .. })
    ));

    // the same material without the hint verifies RS512
    let JsonWebKey::Rsa(public) = rsa_jwk else {
        panic!("not an RSA key");
    };
    let verifier = rsa::Verifier::new(public.key.clone(), RsassaPkcs1V1_5::Rs512);
    JsonWebToken::decode(&read_vector("rs512")?)?.verify(&[&jwt::Signature::new(&verifier)])?;

    Ok(())
}

#[test]
fn signed_with_fixture_keys() -> TestResult {
    let json = read_key("rsa")?;
    let rsa_key = rsa::PrivateKey::from_components(
        &component(&json, "n")?,
        &component(&json, "e")?,
        &component(&json, "d")?,
        &component(&json, "p")?,
        &component(&json, "q")?,
    )?;
    let rsa_signer = rsa::Signer::new(rsa_key, RsassaPkcs1V1_5::Rs256).with_key_id("rsa-2048");

    let json = read_key("p384")?;
    let ec_key = ec::PrivateKey::from_bytes(ec::Curve::P384, &component(&json, "d")?)?;
    let ec_signer = ec::Signer::new(EcDSA::Es384, ec_key)?.with_key_id("ec-p-384");

    let set = read_jwks()?;
    let claims = StandardClaims::new()
        .with_issuer("oauth-server")
        .with_audience(["app", "admin"])
        .with_issued_at(ISSUED_AT);

    let signers: [&dyn jose_envelope::jws::Signer<jose_envelope::crypto::Signature>; 2] =
        [&rsa_signer, &ec_signer];
    for signer in signers {
        let token = JsonWebToken::decode(&JsonWebToken::sign(signer, &claims)?.to_string())?;

        let kid = token.header().key_id().ok_or("no kid")?;
        let verifier = JwkVerifier::try_from(set.find_by_key_id(kid).ok_or("unknown kid")?)?;
        assert_eq!(verifier.key_id(), Some(kid));

        token.verify(&[&jwt::Signature::new(&verifier), &Audience::new("admin")])?;
        assert_eq!(token.deserialize_claims::<StandardClaims>()?, claims);
    }

    Ok(())
}

#[test]
fn custom_claims() -> TestResult {
    #[derive(Debug, Deserialize)]
    struct Session {
        sub: String,
        roles: Vec<String>,
    }

    let token = JsonWebToken::sign(
        &Unsecured,
        &json!({ "sub": "alice", "roles": ["admin"], "iat": 1.5e9 }),
    )?;
    let token = JsonWebToken::decode(&token.to_string())?;

    let is_admin = |token: &JsonWebToken| -> Result<(), VerifierError> {
        let roles = token.claims().string_list("roles")?.unwrap_or_default();
        if roles.contains(&"admin") {
            Ok(())
        } else {
            Err(VerifierError::custom("not an admin"))
        }
    };
    token.verify(&[&jwt::Signature::new(&Unsecured), &is_admin])?;
    assert_eq!(token.claims().timestamp(jwt::ISSUED_AT)?, Some(1_500_000_000));

    let session: Session = token.deserialize_claims()?;
    assert_eq!(session.sub, "alice");
    assert_eq!(session.roles, ["admin"]);

    let token = JsonWebToken::sign(&Unsecured, &json!({ "roles": "user" }))?;
    let err = token.verify(&[&is_admin]).unwrap_err();
    assert_eq!(err.cause.to_string(), "not an admin");

    Ok(())
}

#[test]
fn unsecured_tokens_need_an_explicit_verifier() -> TestResult {
    let token = JsonWebToken::sign(&Unsecured, &claims())?;
    assert_eq!(token.header().algorithm(), &JsonWebSigningAlgorithm::None);

    let key = hmac::Key::<hmac::Hs256>::new(b"k");
    let err = token.verify(&[&jwt::Signature::new(&key)]).unwrap_err();
    assert!(matches!(err.cause, VerifierError::Signature(_)));

    let verifiers: Vec<&dyn Verifier> = vec![];
    token.verify(&verifiers)?;

    Ok(())
}
