//! Suffix-based resolution rules.
//!
//! Each rule is a discrete unit with a predicate (`applies`) and a resolve
//! function, evaluated in a fixed order by [`rule_chain`]. The first rule
//! whose predicate matches fully decides the outcome; there is no
//! backtracking into later rules. This keeps every rule independently
//! testable while preserving first-match-wins semantics.
//!
//! Rule order:
//!
//! 1. Basic case (single-segment names): fixed special table, then
//!    `{name}.class.php` / `{name}.php` over the include path.
//! 2. `Controller` → `{stem}.controller.php` under the controller (or
//!    admin) directory, verified.
//! 3. `Exception` → `Exception/{stem}{suffix}.class.php`, unconditional.
//! 4. `Integrate` → `{stem}.integrate.php`, verified.
//! 5. `Display` / `Payment` → `Subscriptions-{name}.class.php`,
//!    unconditional.
//! 6. `Module` → `modules/{first}/{stem}Module.class.php`, verified, no
//!    further fallback.
//! 7. `Interface` / `Abstract` → base dir, then `{stem}/` subdirectory,
//!    then the module tree when the second segment is `Module`.
//! 8. General case → `{stem}{suffix}.class.php` then `{stem}{suffix}.php`
//!    over the include path.

use std::path::PathBuf;

use crate::oracle::FileOracle;
use crate::paths::SearchPaths;
use crate::token::ClassNameToken;

/// Outcome of a single applicable rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RuleOutcome {
    /// A candidate file was produced.
    Found(PathBuf),
    /// The rule applied but yields nothing; resolution stops here.
    NotFound,
}

/// One resolution rule: predicate plus resolve function.
pub(crate) trait ResolutionRule {
    /// Rule name, for diagnostics.
    fn name(&self) -> &'static str;

    /// True if this rule decides the outcome for `token`.
    fn applies(&self, token: &ClassNameToken) -> bool;

    /// Computes the candidate for a token this rule applies to.
    fn resolve(
        &self,
        token: &ClassNameToken,
        paths: &SearchPaths,
        fs: &dyn FileOracle,
    ) -> RuleOutcome;
}

/// Builds the fixed rule chain, in evaluation order.
pub(crate) fn rule_chain() -> Vec<Box<dyn ResolutionRule>> {
    vec![
        Box::new(BasicCaseRule),
        Box::new(ControllerRule),
        Box::new(ExceptionRule),
        Box::new(IntegrateRule),
        Box::new(SubscriptionRule),
        Box::new(ModuleRule),
        Box::new(AbstractInterfaceRule),
        Box::new(GeneralRule),
    ]
}

/// Special-cased single-segment names. A `None` path marks a name that is
/// loaded by the bootstrap before the resolver ever runs; resolving it
/// here would double-include it, so the resolver deliberately reports it
/// as not found.
const SPECIAL_CASES: &[(&str, Option<&str>)] = &[
    ("Util", Some("Util.class.php")),
    ("Debug", Some("Debug.class.php")),
    ("Request", Some("Request.class.php")),
    ("Emoji", Some("Emoji.class.php")),
    ("Settings", None),
    ("Bootstrap", None),
];

/// Single-segment names: special table first, then the generic
/// `.class.php` / `.php` probe over the include path.
struct BasicCaseRule;

impl ResolutionRule for BasicCaseRule {
    fn name(&self) -> &'static str {
        "basic-case"
    }

    fn applies(&self, token: &ClassNameToken) -> bool {
        token.stem().is_empty()
    }

    fn resolve(
        &self,
        token: &ClassNameToken,
        paths: &SearchPaths,
        fs: &dyn FileOracle,
    ) -> RuleOutcome {
        if let Some((_, file)) = SPECIAL_CASES.iter().find(|(name, _)| *name == token.suffix()) {
            return match file {
                Some(rel) => RuleOutcome::Found(paths.source().join(rel)),
                None => RuleOutcome::NotFound,
            };
        }

        let names = vec![
            format!("{}.class.php", token.suffix()),
            format!("{}.php", token.suffix()),
        ];
        match paths.find_first(&names, fs) {
            Some(path) => RuleOutcome::Found(path),
            None => RuleOutcome::NotFound,
        }
    }
}

/// `{stem}.controller.php` under the controller directory, falling back
/// to the admin directory. Verified to exist.
struct ControllerRule;

impl ResolutionRule for ControllerRule {
    fn name(&self) -> &'static str {
        "controller"
    }

    fn applies(&self, token: &ClassNameToken) -> bool {
        !token.stem().is_empty() && token.suffix() == "Controller"
    }

    fn resolve(
        &self,
        token: &ClassNameToken,
        paths: &SearchPaths,
        fs: &dyn FileOracle,
    ) -> RuleOutcome {
        let file = format!("{}.controller.php", token.stem());
        for dir in [paths.controllers(), paths.admin_controllers()] {
            let candidate = dir.join(&file);
            if fs.exists(&candidate) {
                return RuleOutcome::Found(candidate);
            }
        }
        RuleOutcome::NotFound
    }
}

/// `Exception/{stem}{suffix}.class.php`, trusted without an existence
/// check at this stage.
struct ExceptionRule;

impl ResolutionRule for ExceptionRule {
    fn name(&self) -> &'static str {
        "exception"
    }

    fn applies(&self, token: &ClassNameToken) -> bool {
        !token.stem().is_empty() && token.suffix() == "Exception"
    }

    fn resolve(
        &self,
        token: &ClassNameToken,
        paths: &SearchPaths,
        _fs: &dyn FileOracle,
    ) -> RuleOutcome {
        RuleOutcome::Found(
            paths
                .exceptions()
                .join(format!("{}.class.php", token.joined())),
        )
    }
}

/// `{stem}.integrate.php` on the include path, verified.
struct IntegrateRule;

impl ResolutionRule for IntegrateRule {
    fn name(&self) -> &'static str {
        "integrate"
    }

    fn applies(&self, token: &ClassNameToken) -> bool {
        !token.stem().is_empty() && token.suffix() == "Integrate"
    }

    fn resolve(
        &self,
        token: &ClassNameToken,
        paths: &SearchPaths,
        fs: &dyn FileOracle,
    ) -> RuleOutcome {
        let file = format!("{}.integrate.php", token.stem());
        match paths.find(&file, fs) {
            Some(path) => RuleOutcome::Found(path),
            None => RuleOutcome::NotFound,
        }
    }
}

/// `Display` / `Payment` gateway classes all live in one subscriptions
/// file named after the full class name.
struct SubscriptionRule;

impl ResolutionRule for SubscriptionRule {
    fn name(&self) -> &'static str {
        "subscription"
    }

    fn applies(&self, token: &ClassNameToken) -> bool {
        !token.stem().is_empty() && matches!(token.suffix(), "Display" | "Payment")
    }

    fn resolve(
        &self,
        token: &ClassNameToken,
        paths: &SearchPaths,
        _fs: &dyn FileOracle,
    ) -> RuleOutcome {
        RuleOutcome::Found(
            paths
                .source()
                .join(format!("Subscriptions-{}.class.php", token.name())),
        )
    }
}

/// `modules/{first}/{stem}Module.class.php`, verified. A missing module
/// file is terminal: no later rule gets a chance.
struct ModuleRule;

impl ResolutionRule for ModuleRule {
    fn name(&self) -> &'static str {
        "module"
    }

    fn applies(&self, token: &ClassNameToken) -> bool {
        !token.stem().is_empty() && token.suffix() == "Module"
    }

    fn resolve(
        &self,
        token: &ClassNameToken,
        paths: &SearchPaths,
        fs: &dyn FileOracle,
    ) -> RuleOutcome {
        let segments = token.segments();
        let candidate = paths
            .modules()
            .join(segments[0])
            .join(format!("{}Module.class.php", token.stem()));
        if fs.exists(&candidate) {
            RuleOutcome::Found(candidate)
        } else {
            RuleOutcome::NotFound
        }
    }
}

/// `Interface` / `Abstract` contracts: base directory first, then a
/// subdirectory named after the stem, then the module tree when the
/// second name segment is `Module`.
struct AbstractInterfaceRule;

impl ResolutionRule for AbstractInterfaceRule {
    fn name(&self) -> &'static str {
        "abstract-interface"
    }

    fn applies(&self, token: &ClassNameToken) -> bool {
        !token.stem().is_empty() && matches!(token.suffix(), "Interface" | "Abstract")
    }

    fn resolve(
        &self,
        token: &ClassNameToken,
        paths: &SearchPaths,
        fs: &dyn FileOracle,
    ) -> RuleOutcome {
        let file = if token.suffix() == "Interface" {
            format!("{}.interface.php", token.stem())
        } else {
            format!("{}Abstract.class.php", token.stem())
        };

        let direct = paths.source().join(&file);
        if fs.exists(&direct) {
            return RuleOutcome::Found(direct);
        }

        let nested = paths.source().join(token.stem()).join(&file);
        if fs.exists(&nested) {
            return RuleOutcome::Found(nested);
        }

        let segments = token.segments();
        if segments.len() > 1 && segments[1] == "Module" {
            let module = paths.modules().join(segments[0]).join(&file);
            if fs.exists(&module) {
                return RuleOutcome::Found(module);
            }
        }

        RuleOutcome::NotFound
    }
}

/// The general case for multi-segment names with no recognized suffix:
/// `{stem}{suffix}.class.php` then `{stem}{suffix}.php` over the include
/// path.
struct GeneralRule;

impl ResolutionRule for GeneralRule {
    fn name(&self) -> &'static str {
        "general"
    }

    fn applies(&self, token: &ClassNameToken) -> bool {
        !token.stem().is_empty()
    }

    fn resolve(
        &self,
        token: &ClassNameToken,
        paths: &SearchPaths,
        fs: &dyn FileOracle,
    ) -> RuleOutcome {
        let names = vec![
            format!("{}.class.php", token.joined()),
            format!("{}.php", token.joined()),
        ];
        match paths.find_first(&names, fs) {
            Some(path) => RuleOutcome::Found(path),
            None => RuleOutcome::NotFound,
        }
    }
}
