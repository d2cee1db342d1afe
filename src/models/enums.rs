use serde::{Deserialize, Serialize};

/// Enum with a fixed wire string per variant, shared by serde and `Display`.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(ResultStatus {
    Low => "low",
    High => "high",
    Normal => "normal",
});

impl ResultStatus {
    pub fn is_abnormal(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}
