//! Data for tests.

pub const TEST_DID_DOCUMENT: &str = r##"
{
  "@context": "https://www.w3.org/ns/did/v1",
  "id": "did:example:123",
  "verificationMethod": [
    {
      "id": "did:example:123#keys-1",
      "type": "Ed25519VerificationKey2018",
      "controller": "did:example:123",
      "publicKeyBase58": "H3C2AVvLMv6gmMNam3uVAjZpfkcJCwDwnZn6z3wXmqPV"
    },
    {
      "id": "did:example:123#keys-2",
      "type": "Ed25519VerificationKey2018",
      "controller": "did:example:123",
      "publicKeyBase58": "FiY1Zv1bNG3qKa6BVqXXWjZ3UUxhNkUnEW8S8PSUSSLU"
    },
    {
      "id": "did:example:123#keys-3",
      "type": "X25519KeyAgreementKey2019",
      "controller": "did:example:123",
      "publicKeyBase58": "JhNWeSVLMYccCk7iopQW4guaSJTojqpMEELgSLhKwRr"
    }
  ],
  "assertionMethod": [
    "did:example:123#keys-1",
    "did:example:123#keys-2"
  ],
  "authentication": [
    "did:example:123#keys-2"
  ],
  "keyAgreement": [
    "did:example:123#keys-3"
  ]
}
"##;

pub const TEST_CREDENTIAL_TEMPLATE: &str = r##"
{
  "@context": [
    "https://www.w3.org/2018/credentials/v1",
    "https://www.w3.org/2018/credentials/examples/v1"
  ],
  "type": ["VerifiableCredential"],
  "credentialSubject": {
    "degree": {
      "type": "BachelorDegree",
      "name": "Bachelor of Science and Arts",
      "college": "College of Engineering"
    }
  }
}
"##;

/// Template identifier under which tests register [`TEST_CREDENTIAL_TEMPLATE`].
pub const TEST_TEMPLATE_ID: &str = "vc-template-default";
