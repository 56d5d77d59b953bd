mod endpoints_test;
