//! Live role assumption against AWS STS.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use landing_core::Partition;
    use landing_credentials::{
        CredentialBroker, CredentialRequest, DefaultChainSeed, SeedCredentialSource, StsRoleAssumer,
    };
    use landing_retry::{BackoffPolicy, RetryingInvoker};

    use crate::{account, init_tracing, region};

    const ROLE: &str = "AWSControlTowerExecution";

    fn member_account() -> String {
        std::env::var("LANDING_IT_MEMBER_ACCOUNT").expect("LANDING_IT_MEMBER_ACCOUNT must be set")
    }

    async fn live_broker() -> (CredentialBroker, landing_core::Credentials) {
        init_tracing();
        let seed = DefaultChainSeed::new(region("us-east-1"))
            .load()
            .await
            .expect("seed credentials from the default chain");
        let broker = CredentialBroker::new(
            Arc::new(StsRoleAssumer::new(Partition::Aws)),
            RetryingInvoker::new(BackoffPolicy::new(
                4,
                Duration::from_millis(200),
                Duration::from_secs(2),
            )),
            // Management account is only used to short-circuit; a placeholder
            // keeps every request on the STS path.
            account("000000000000"),
        );
        (broker, seed)
    }

    #[tokio::test]
    #[ignore = "requires AWS management account credentials"]
    async fn test_should_assume_access_role_in_member_account() {
        let (broker, seed) = live_broker().await;
        let member = account(&member_account());
        let home = region("us-east-1");

        let creds = broker
            .get_credentials(CredentialRequest {
                account_id: &member,
                region: &home,
                role_name: ROLE,
                seed: &seed,
            })
            .await
            .expect("assume role")
            .expect("role should be assumable");

        assert!(creds.session_token.is_some());
        assert_ne!(creds.access_key_id, seed.access_key_id);

        // Second request is served from the cache.
        let again = broker
            .get_credentials(CredentialRequest {
                account_id: &member,
                region: &home,
                role_name: ROLE,
                seed: &seed,
            })
            .await
            .expect("cached credentials")
            .expect("role should be assumable");
        assert_eq!(again, creds);
        assert_eq!(broker.cached(), 1);
    }

    #[tokio::test]
    #[ignore = "requires AWS management account credentials"]
    async fn test_should_report_missing_role_as_no_credentials() {
        let (broker, seed) = live_broker().await;
        let member = account(&member_account());

        let creds = broker
            .get_credentials(CredentialRequest {
                account_id: &member,
                region: &region("us-east-1"),
                role_name: "landing-role-that-does-not-exist",
                seed: &seed,
            })
            .await
            .expect("a missing role is not an error");

        assert!(creds.is_none());
    }
}
