/// How a language announces itself in a component directory
#[derive(Debug, Clone, Copy)]
pub struct LanguageRule {
    pub name: &'static str,
    /// Other spellings used by registry `language` fields and tags
    pub aliases: &'static [&'static str],
    pub extensions: &'static [&'static str],
    /// Exact file names, or `*.ext` suffix patterns
    pub config_files: &'static [&'static str],
    /// (needle in a config file, framework name)
    pub frameworks: &'static [(&'static str, &'static str)],
}

impl LanguageRule {
    pub fn matches_config_file(&self, file_name: &str) -> bool {
        self.config_files.iter().any(|pattern| match pattern.strip_prefix('*') {
            Some(suffix) => file_name.to_ascii_lowercase().ends_with(suffix),
            None => file_name == *pattern,
        })
    }

    pub fn matches_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Whether `label` names this language
    pub fn is_named(&self, label: &str) -> bool {
        let label = label.trim();
        !label.is_empty()
            && (self.name.eq_ignore_ascii_case(label)
                || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(label)))
    }
}

pub fn rule_for(name: &str) -> Option<&'static LanguageRule> {
    LANGUAGE_RULES.iter().find(|rule| rule.name == name)
}

pub static LANGUAGE_RULES: &[LanguageRule] = &[
    LanguageRule {
        name: "Java",
        aliases: &["jvm"],
        extensions: &["java"],
        config_files: &["pom.xml", "build.gradle", "build.gradle.kts"],
        frameworks: &[
            ("spring-boot", "springboot"),
            ("io.quarkus", "quarkus"),
            ("io.micronaut", "micronaut"),
            ("io.vertx", "vertx"),
            ("wildfly", "wildfly"),
        ],
    },
    LanguageRule {
        name: "JavaScript",
        aliases: &["nodejs", "node.js", "node"],
        extensions: &["js", "mjs", "cjs", "jsx"],
        config_files: &["package.json"],
        frameworks: &[
            ("\"next\"", "nextjs"),
            ("\"nuxt\"", "nuxt.js"),
            ("\"@angular/core\"", "angular"),
            ("\"vue\"", "vue"),
            ("\"react\"", "react"),
            ("\"express\"", "express"),
        ],
    },
    LanguageRule {
        name: "TypeScript",
        aliases: &["ts"],
        extensions: &["ts", "tsx"],
        config_files: &["tsconfig.json"],
        frameworks: &[],
    },
    LanguageRule {
        name: "Python",
        aliases: &["py"],
        extensions: &["py"],
        config_files: &["requirements.txt", "pyproject.toml", "setup.py", "Pipfile"],
        frameworks: &[
            ("django", "django"),
            ("flask", "flask"),
            ("fastapi", "fastapi"),
        ],
    },
    LanguageRule {
        name: "Go",
        aliases: &["golang"],
        extensions: &["go"],
        config_files: &["go.mod"],
        frameworks: &[
            ("github.com/gin-gonic/gin", "gin"),
            ("github.com/labstack/echo", "echo"),
            ("github.com/gofiber/fiber", "fiber"),
        ],
    },
    LanguageRule {
        name: "Rust",
        aliases: &[],
        extensions: &["rs"],
        config_files: &["Cargo.toml"],
        frameworks: &[("axum", "axum"), ("actix-web", "actix")],
    },
    LanguageRule {
        name: "C#",
        aliases: &["csharp", "dotnet", ".net"],
        extensions: &["cs"],
        config_files: &["*.csproj", "*.sln"],
        frameworks: &[("microsoft.aspnetcore", "aspnet")],
    },
    LanguageRule {
        name: "Ruby",
        aliases: &[],
        extensions: &["rb"],
        config_files: &["Gemfile"],
        frameworks: &[("rails", "rails"), ("sinatra", "sinatra")],
    },
    LanguageRule {
        name: "PHP",
        aliases: &[],
        extensions: &["php"],
        config_files: &["composer.json"],
        frameworks: &[("laravel/framework", "laravel"), ("symfony/", "symfony")],
    },
];
