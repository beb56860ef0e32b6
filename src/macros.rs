#[macro_export]
macro_rules! rule {
    ($flags:literal, $match_:literal, $subst:literal) => {
        $crate::compile($flags, $match_, $subst).unwrap()
    };
}

#[macro_export]
macro_rules! ruleset {
    ( $( ($flags:literal, $match_:literal, $subst:literal) ),* $(,)? ) => {
        $crate::RuleSet::new(vec![ $( $crate::rule!($flags, $match_, $subst) ),* ])
    };
}
