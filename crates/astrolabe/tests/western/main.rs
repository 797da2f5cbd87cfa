mod dignities_tests;
mod placement_tests;
