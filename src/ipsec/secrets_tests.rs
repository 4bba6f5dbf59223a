//! Tests for the `ipsec.secrets` patcher.

use tempfile::TempDir;

use super::{MalformedEntry, RewriteError, SecretsFile};

const SECRETS: &str = "\
# /etc/ipsec.secrets
10.0.0.1 203.0.113.9 : PSK \"s3cret-a\" #dhcp-interface=eth0#
172.16.0.1 198.51.100.4 : PSK \"s3cret-b\"
192.168.1.20 192.0.2.77 : PSK \"s3cret-c\" #dhcp-interface=eth1#
";

mod rendering {
    use super::*;

    #[test]
    fn rewrites_only_lines_tagged_for_interface() {
        let secrets = SecretsFile::parse(SECRETS);

        let (content, updated) = secrets.render_for("eth0", Some("1.2.3.4")).unwrap();

        assert_eq!(updated, 1);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "# /etc/ipsec.secrets");
        assert_eq!(
            lines[1],
            "1.2.3.4 203.0.113.9 : PSK \"s3cret-a\" #dhcp-interface=eth0#"
        );
        assert_eq!(lines[2], "172.16.0.1 198.51.100.4 : PSK \"s3cret-b\"");
        assert_eq!(
            lines[3],
            "192.168.1.20 192.0.2.77 : PSK \"s3cret-c\" #dhcp-interface=eth1#"
        );
    }

    #[test]
    fn untouched_lines_keep_their_bytes() {
        let content = "a b : PSK x\r\n10.0.0.1 peer : PSK k #dhcp-interface=eth0#\r\nlast line";
        let secrets = SecretsFile::parse(content);

        let (rendered, _) = secrets.render_for("eth0", Some("10.0.0.9")).unwrap();

        assert_eq!(
            rendered,
            "a b : PSK x\r\n10.0.0.9 peer : PSK k #dhcp-interface=eth0#\r\nlast line"
        );
    }

    #[test]
    fn absent_address_uses_placeholder() {
        let secrets = SecretsFile::parse(SECRETS);

        let (content, _) = secrets.render_for("eth0", None).unwrap();

        assert!(content.contains("\n# 203.0.113.9 : PSK \"s3cret-a\" #dhcp-interface=eth0#\n"));
    }

    #[test]
    fn empty_address_uses_placeholder() {
        let secrets = SecretsFile::parse(SECRETS);

        let (content, _) = secrets.render_for("eth0", Some("")).unwrap();

        assert!(content.contains("\n# 203.0.113.9 : PSK"));
    }

    #[test]
    fn placeholder_line_can_be_restored() {
        let secrets = SecretsFile::parse("# peer : PSK k #dhcp-interface=eth0#\n");

        let (content, updated) = secrets.render_for("eth0", Some("10.0.0.3")).unwrap();

        assert_eq!(updated, 1);
        assert_eq!(content, "10.0.0.3 peer : PSK k #dhcp-interface=eth0#\n");
    }

    #[test]
    fn unmatched_interface_is_identity() {
        let secrets = SecretsFile::parse(SECRETS);

        let (content, updated) = secrets.render_for("eth9", Some("1.2.3.4")).unwrap();

        assert_eq!(updated, 0);
        assert_eq!(content, SECRETS);
    }

    #[test]
    fn malformed_tagged_line_is_rejected() {
        let secrets = SecretsFile::parse("ok line\ngarbage #dhcp-interface=eth0#\n");

        let result = secrets.render_for("eth0", Some("1.2.3.4"));

        assert_eq!(result, Err(MalformedEntry { line: 2 }));
    }

    #[test]
    fn malformed_line_for_other_interface_is_ignored() {
        let secrets = SecretsFile::parse("garbage #dhcp-interface=eth1#\n");

        let (content, updated) = secrets.render_for("eth0", Some("1.2.3.4")).unwrap();

        assert_eq!(updated, 0);
        assert_eq!(content, "garbage #dhcp-interface=eth1#\n");
    }
}

mod file_operations {
    use super::*;

    #[test]
    fn write_replaces_tagged_addresses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ipsec.secrets");
        std::fs::write(&path, SECRETS).unwrap();

        let secrets = SecretsFile::read(&path).unwrap();
        let updated = secrets.write(&path, "eth1", Some("192.168.1.33")).unwrap();

        assert_eq!(updated, 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            SECRETS.replace("192.168.1.20 ", "192.168.1.33 ")
        );
    }

    #[test]
    fn malformed_entry_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ipsec.secrets");
        let original = "10.0.0.1 : PSK #dhcp-interface=eth0#\n";
        std::fs::write(&path, original).unwrap();

        let secrets = SecretsFile::read(&path).unwrap();
        let result = secrets.write(&path, "eth0", Some("10.0.0.2"));

        match result {
            Err(RewriteError::MalformedSecret { line, .. }) => assert_eq!(line, 1),
            other => panic!("Expected MalformedSecret, got {other:?}"),
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn read_missing_file_fails() {
        let dir = TempDir::new().unwrap();

        let result = SecretsFile::read(&dir.path().join("ipsec.secrets"));

        assert!(matches!(result, Err(RewriteError::Read { .. })));
    }

    #[test]
    fn parse_keeps_line_count() {
        let secrets = SecretsFile::parse(SECRETS);
        assert_eq!(secrets.lines().len(), 4);
    }
}
