pub mod case_tree;
