use serde::{Deserialize, Serialize};

// 教师角色
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TeacherRole {
    Admin,       // 管理员
    Headteacher, // 年级主任
    #[default]
    Teacher, // 教师
}

impl TeacherRole {
    pub const ADMIN: &'static str = "admin";
    pub const HEADTEACHER: &'static str = "headteacher";
    pub const TEACHER: &'static str = "teacher";
}

impl<'de> Deserialize<'de> for TeacherRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的教师角色: '{s}'. 支持的角色: admin, headteacher, teacher"
            ))
        })
    }
}

impl std::fmt::Display for TeacherRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeacherRole::Admin => write!(f, "{}", TeacherRole::ADMIN),
            TeacherRole::Headteacher => write!(f, "{}", TeacherRole::HEADTEACHER),
            TeacherRole::Teacher => write!(f, "{}", TeacherRole::TEACHER),
        }
    }
}

impl std::str::FromStr for TeacherRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TeacherRole::ADMIN => Ok(TeacherRole::Admin),
            TeacherRole::HEADTEACHER => Ok(TeacherRole::Headteacher),
            TeacherRole::TEACHER => Ok(TeacherRole::Teacher),
            _ => Err(format!("Invalid teacher role: {s}")),
        }
    }
}

// 教师（存放于 users 集合）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    #[serde(default)]
    pub verified: bool,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub role: TeacherRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}
